//! Nearest-neighbor search over planar points with two independent
//! structures: a variance-adaptive 2d-tree ([`KdTree`]) and a vantage
//! point tree ([`VpTree`]). Both are built once and queried read-only.
pub mod error;
pub mod kdtree;
pub mod median;
pub mod nearest;
pub mod point;
pub mod vptree;

pub use error::{ConstructionError, QueryError};
pub use kdtree::{Axis, KdNode, KdTree, Region};
pub use nearest::Nearest;
pub use point::{distance, Float, MetricItem, Point, Scalar};
pub use vptree::{VpNode, VpTree};
