//! A 2d-tree whose split axis is chosen per node by coordinate variance.
//!
//! Every node stores the closed, axis-aligned region it is responsible
//! for, so external renderers can draw the split lines without walking
//! back up the tree.
use std::fmt::{self, Display};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::{ConstructionError, QueryError};
use crate::median::{sample_variance, split_order, stable_order};
use crate::nearest::Nearest;
use crate::point::{distance, Point, Scalar};

/// Coordinate axis a node splits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn coord<F: Scalar>(self, p: &Point<F>) -> F {
        match self {
            Axis::X => p.x(),
            Axis::Y => p.y(),
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

/// Closed axis-aligned rectangle; any bound may be infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region<F: Scalar> {
    pub xmin: F,
    pub xmax: F,
    pub ymin: F,
    pub ymax: F,
}

impl<F: Scalar> Region<F> {
    /// The whole plane.
    pub fn unbounded() -> Self {
        Region {
            xmin: F::neg_infinity(),
            xmax: F::infinity(),
            ymin: F::neg_infinity(),
            ymax: F::infinity(),
        }
    }

    pub fn contains(&self, p: &Point<F>) -> bool {
        self.xmin <= p.x() && p.x() <= self.xmax && self.ymin <= p.y() && p.y() <= self.ymax
    }

    /// Cut the region along `axis` at `at`, returning the (lower, upper) halves.
    pub fn split(&self, axis: Axis, at: F) -> (Self, Self) {
        let (mut lower, mut upper) = (*self, *self);
        match axis {
            Axis::X => {
                lower.xmax = at;
                upper.xmin = at;
            }
            Axis::Y => {
                lower.ymax = at;
                upper.ymin = at;
            }
        }
        (lower, upper)
    }
}

pub struct KdNode<F: Scalar> {
    point: Point<F>,
    region: Region<F>,
    axis: Axis,
    left: Option<Box<KdNode<F>>>,
    right: Option<Box<KdNode<F>>>,
}

impl<F: Scalar> KdNode<F> {
    pub fn point(&self) -> &Point<F> {
        &self.point
    }

    pub fn region(&self) -> &Region<F> {
        &self.region
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn left(&self) -> Option<&KdNode<F>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&KdNode<F>> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn height(&self) -> usize {
        let l = self.left().map_or(0, KdNode::height);
        let r = self.right().map_or(0, KdNode::height);
        1 + l.max(r)
    }

    /// Depth-first search below this node, improving `best` in place.
    ///
    /// The near side is searched first; the far side only when the
    /// splitting line is strictly closer than the current best.
    fn search<'a>(&'a self, query: &Point<F>, best: &mut Nearest<'a, F, Point<F>>,
                  visited: &mut usize) {
        *visited += 1;
        let d = distance(query, &self.point);
        if d < best.distance {
            *best = Nearest::new(&self.point, d);
        }

        let delta = self.axis.coord(query) - self.axis.coord(&self.point);
        let (near, far) = if delta < F::zero() {
            (self.left(), self.right())
        } else {
            (self.right(), self.left())
        };

        if let Some(node) = near {
            node.search(query, best, visited);
        }
        if delta.abs() < best.distance {
            if let Some(node) = far {
                node.search(query, best, visited);
            }
        }
    }
}

impl<F: Scalar> Display for KdNode<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, split={}]", self.point, self.axis)
    }
}

/// Working set for one subtree: the same indices ordered along each axis.
struct Subset {
    by_x: Vec<usize>,
    by_y: Vec<usize>,
}

struct Builder<'p, F: Scalar> {
    points: &'p [Point<F>],
    marks: Vec<bool>,
}

impl<'p, F: Scalar> Builder<'p, F> {
    /// Axis with the larger sample variance of coordinate values; ties favor x.
    fn choose_axis(&self, subset: &Subset) -> Axis {
        let pts = self.points;
        let vx = sample_variance(subset.by_x.iter().map(|&i| pts[i].x()));
        let vy = sample_variance(subset.by_y.iter().map(|&i| pts[i].y()));
        if vy > vx { Axis::Y } else { Axis::X }
    }

    /// Build the subtree for `subset`, which occupies `region` of its parent.
    ///
    /// Both halves have at most half the subset, so recursion depth is
    /// bounded by log2 of the input size.
    fn build(&mut self, subset: Subset, region: Region<F>) -> Box<KdNode<F>> {
        let axis = self.choose_axis(&subset);
        let Subset { by_x, by_y } = subset;
        let (primary, secondary) = match axis {
            Axis::X => (by_x, by_y),
            Axis::Y => (by_y, by_x),
        };

        let mid = primary.len() / 2;
        let pivot = primary[mid];
        let point = self.points[pivot];
        let (before, after) = (&primary[..mid], &primary[mid + 1..]);
        let (sec_before, sec_after) = split_order(&secondary, before, pivot, &mut self.marks);

        let subset_of = |prim: &[usize], sec: Vec<usize>| match axis {
            Axis::X => Subset { by_x: prim.to_vec(), by_y: sec },
            Axis::Y => Subset { by_x: sec, by_y: prim.to_vec() },
        };
        let (left_subset, right_subset) = (subset_of(before, sec_before), subset_of(after, sec_after));

        let (left_region, right_region) = region.split(axis, axis.coord(&point));
        let left = if before.is_empty() { None } else { Some(self.build(left_subset, left_region)) };
        let right = if after.is_empty() { None } else { Some(self.build(right_subset, right_region)) };

        Box::new(KdNode { point, region, axis, left, right })
    }
}

/// A 2d-tree over a fixed set of points.
pub struct KdTree<F: Scalar = f64> {
    root: Box<KdNode<F>>,
    len: usize,
}

impl<F: Scalar> KdTree<F> {
    /// Build a tree from paired coordinate sequences.
    pub fn new(xs: &[F], ys: &[F]) -> Result<KdTree<F>, ConstructionError> {
        if xs.len() != ys.len() {
            return Err(ConstructionError::LengthMismatch { xs: xs.len(), ys: ys.len() });
        }
        let points: Vec<Point<F>> = xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect();
        KdTree::from_points(&points)
    }

    /// Build a tree from points. The input is left untouched.
    pub fn from_points(points: &[Point<F>]) -> Result<KdTree<F>, ConstructionError> {
        if points.is_empty() {
            return Err(ConstructionError::Empty);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ConstructionError::NonFinite { index });
        }

        let n = points.len();
        let subset = Subset {
            by_x: stable_order(n, |i| points[i].x()),
            by_y: stable_order(n, |i| points[i].y()),
        };
        let mut builder = Builder { points, marks: vec![false; n] };
        let root = builder.build(subset, Region::unbounded());
        let tree = KdTree { root, len: n };

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, nodes = n, height = tree.height(), "built kd-tree");

        Ok(tree)
    }

    pub fn root(&self) -> &KdNode<F> {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a tree cannot be built from zero points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Find the stored point closest to `query`.
    ///
    /// Among equally distant points the first one reached in search order
    /// wins. A query with a NaN coordinate never improves on the root.
    pub fn nearest(&self, query: &Point<F>) -> Result<Nearest<'_, F, Point<F>>, QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyTree);
        }
        let root = &*self.root;
        let mut best = Nearest::new(&root.point, distance(query, &root.point));
        let mut visited = 0;
        root.search(query, &mut best, &mut visited);

        #[cfg(feature = "tracing")]
        event!(Level::TRACE, visited, distance = %best.distance, "kd-tree nearest");

        Ok(best)
    }

    /// Nodes in order (left subtree, node, right subtree).
    pub fn nodes(&self) -> Nodes<'_, F> {
        Nodes::new(Some(&*self.root))
    }

    /// Stored points in order. Each call starts a fresh enumeration.
    pub fn traverse(&self) -> impl Iterator<Item = &Point<F>> + '_ {
        self.nodes().map(KdNode::point)
    }

    /// One line per node, in order.
    pub fn dump(&self) -> String {
        self.nodes().map(|n| n.to_string()).collect::<Vec<_>>().join("\n")
    }
}

/// In-order node iterator for [`KdTree`].
pub struct Nodes<'a, F: Scalar> {
    stack: Vec<&'a KdNode<F>>,
    next: Option<&'a KdNode<F>>,
}

impl<'a, F: Scalar> Nodes<'a, F> {
    fn new(root: Option<&'a KdNode<F>>) -> Self {
        Nodes { stack: Vec::new(), next: root }
    }
}

impl<'a, F: Scalar> Iterator for Nodes<'a, F> {
    type Item = &'a KdNode<F>;

    fn next(&mut self) -> Option<&'a KdNode<F>> {
        while let Some(node) = self.next.take() {
            self.stack.push(node);
            self.next = node.left();
        }
        let node = self.stack.pop()?;
        self.next = node.right();
        Some(node)
    }
}
