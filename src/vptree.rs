//! Vantage-Point Trees are a data structure for fast
//! nearest-neighbor searches in metric spaces.
//!
//! Nodes live in a flat vector indexed by their position in the permuted
//! input, and every walk over the tree uses an explicit stack: distance
//! ties can make the tree as deep as it is long.
use std::fmt::{self, Display};

use rand::Rng;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::{ConstructionError, QueryError};
use crate::median::select_inner;
use crate::nearest::Nearest;
use crate::point::{MetricItem, Scalar};

#[derive(Clone, Copy)]
struct Link<F: Scalar> {
    mu: F,
    inner: Option<usize>,
    outer: Option<usize>,
}

pub struct VpNode<F: Scalar, T> {
    vantage_point: T,
    mu: F,
    inner: Option<usize>,
    outer: Option<usize>,
}

impl<F: Scalar, T> VpNode<F, T> {
    pub fn vantage_point(&self) -> &T {
        &self.vantage_point
    }

    /// Radius separating inner (`<= mu`) from outer (`> mu`) descendants.
    /// Zero for leaves.
    pub fn mu(&self) -> F {
        self.mu
    }

    pub fn is_leaf(&self) -> bool {
        self.inner.is_none() && self.outer.is_none()
    }
}

impl<F: Scalar, T: Display> Display for VpNode<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(vp={}, mu={})", self.vantage_point, self.mu)
    }
}

/// implement a Vp tree
pub struct VpTree<F: Scalar, T: MetricItem<F>> {
    nodes: Vec<VpNode<F, T>>,
    height: usize,
}

impl<F: Scalar, T: MetricItem<F>> VpTree<F, T> {
    /// Construct a new vantage point tree, drawing pivots from the thread rng.
    pub fn new(items: Vec<T>) -> Result<VpTree<F, T>, ConstructionError> {
        VpTree::with_rng(items, &mut rand::thread_rng())
    }

    /// Construct a new vantage point tree with pivots drawn from `rng`.
    ///
    /// The same items and the same rng state always produce the same tree.
    /// An empty `items` yields an empty tree.
    pub fn with_rng<R: Rng>(items: Vec<T>, rng: &mut R) -> Result<VpTree<F, T>, ConstructionError> {
        if let Some(index) = items.iter().position(|t| !t.distance(t).is_finite()) {
            return Err(ConstructionError::NonFinite { index });
        }

        let n = items.len();
        let mut work: Vec<(F, T)> = items.into_iter().map(|t| (F::zero(), t)).collect();
        let mut links = vec![Link { mu: F::zero(), inner: None, outer: None }; n];
        let mut height = 0;

        // (low, up, depth) ranges still to partition; the node for a
        // range is the item left at position `low`.
        let mut stack = Vec::new();
        if n > 0 {
            stack.push((0, n, 1));
        }
        while let Some((low, up, depth)) = stack.pop() {
            height = height.max(depth);
            if up - low == 1 {
                continue;
            }

            work.swap(low, rng.gen_range(low..up));
            let (head, rest) = work[low..up].split_at_mut(1);
            let vp = &head[0].1;
            for entry in rest.iter_mut() {
                entry.0 = vp.distance(&entry.1);
            }

            let k = (rest.len() + 1) / 2;
            let (mu, inner_len) = select_inner(rest, k);

            #[cfg(feature = "tracing")]
            if inner_len > k {
                event!(Level::TRACE, low, up, expected = k, inner = inner_len,
                       "distance ties widened inner partition");
            }

            let split = low + 1 + inner_len;
            links[low] = Link {
                mu,
                inner: Some(low + 1),
                outer: if split < up { Some(split) } else { None },
            };
            if split < up {
                stack.push((split, up, depth + 1));
            }
            stack.push((low + 1, split, depth + 1));
        }

        let nodes: Vec<VpNode<F, T>> = work.into_iter().zip(links)
            .map(|((_, vantage_point), link)| VpNode {
                vantage_point,
                mu: link.mu,
                inner: link.inner,
                outer: link.outer,
            })
            .collect();

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, nodes = n, height, "built vp-tree");

        Ok(VpTree { nodes, height })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn root(&self) -> Option<&VpNode<F, T>> {
        self.nodes.first()
    }

    pub fn inner(&self, node: &VpNode<F, T>) -> Option<&VpNode<F, T>> {
        node.inner.map(|i| &self.nodes[i])
    }

    pub fn outer(&self, node: &VpNode<F, T>) -> Option<&VpNode<F, T>> {
        node.outer.map(|i| &self.nodes[i])
    }

    /// Items stored below `node` on the inner side.
    pub fn inner_items<'a>(&'a self, node: &VpNode<F, T>) -> impl Iterator<Item = &'a T> + 'a {
        Nodes::new(&self.nodes, node.inner).map(VpNode::vantage_point)
    }

    /// Items stored below `node` on the outer side.
    pub fn outer_items<'a>(&'a self, node: &VpNode<F, T>) -> impl Iterator<Item = &'a T> + 'a {
        Nodes::new(&self.nodes, node.outer).map(VpNode::vantage_point)
    }

    /// find the nearest neighbor
    ///
    /// `tau` is the best distance so far; a deferred subtree is skipped
    /// when the triangle inequality puts all of it farther than `tau`.
    /// The inner side is always visited before the outer side.
    pub fn nearest(&self, query: &T) -> Result<Nearest<'_, F, T>, QueryError> {
        let root = self.root().ok_or(QueryError::EmptyTree)?;

        let mut tau = F::infinity();
        let mut best: Option<Nearest<F, T>> = None;
        let mut visited: usize = 0;

        // (node, lower bound on the distance from query to anything below it)
        let mut pending = vec![(0, F::neg_infinity())];
        while let Some((id, bound)) = pending.pop() {
            if bound > tau {
                continue;
            }
            visited += 1;

            let node = &self.nodes[id];
            let d = query.distance(&node.vantage_point);
            if d < tau {
                tau = d;
                best = Some(Nearest::new(&node.vantage_point, d));
            }

            // A NaN bound (infinite `d` and `mu`) keeps the subtree.
            let mu = node.mu;
            if let Some(outer) = node.outer {
                if !(mu - d > tau) {
                    pending.push((outer, mu - d));
                }
            }
            if let Some(inner) = node.inner {
                if !(d - mu > tau) {
                    pending.push((inner, d - mu));
                }
            }
        }

        #[cfg(feature = "tracing")]
        event!(Level::TRACE, visited, distance = %tau, "vp-tree nearest");
        #[cfg(not(feature = "tracing"))]
        let _ = visited;

        // Only NaN or infinite distances leave `best` unset.
        Ok(best.unwrap_or_else(|| {
            Nearest::new(&root.vantage_point, query.distance(&root.vantage_point))
        }))
    }

    /// Nodes in order (inner subtree, node, outer subtree).
    pub fn nodes(&self) -> Nodes<'_, F, T> {
        Nodes::new(&self.nodes, if self.nodes.is_empty() { None } else { Some(0) })
    }

    /// Stored items in order. Each call starts a fresh enumeration.
    pub fn traverse(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes().map(VpNode::vantage_point)
    }

    /// One line per node, in order.
    pub fn dump(&self) -> String where T: Display {
        self.nodes().map(|n| n.to_string()).collect::<Vec<_>>().join("\n")
    }
}

/// In-order node iterator for [`VpTree`].
pub struct Nodes<'a, F: Scalar, T> {
    nodes: &'a [VpNode<F, T>],
    stack: Vec<usize>,
    next: Option<usize>,
}

impl<'a, F: Scalar, T> Nodes<'a, F, T> {
    fn new(nodes: &'a [VpNode<F, T>], start: Option<usize>) -> Self {
        Nodes { nodes, stack: Vec::new(), next: start }
    }
}

impl<'a, F: Scalar, T> Iterator for Nodes<'a, F, T> {
    type Item = &'a VpNode<F, T>;

    fn next(&mut self) -> Option<&'a VpNode<F, T>> {
        while let Some(id) = self.next.take() {
            self.stack.push(id);
            self.next = self.nodes[id].inner;
        }
        let node = &self.nodes[self.stack.pop()?];
        self.next = node.outer;
        Some(node)
    }
}
