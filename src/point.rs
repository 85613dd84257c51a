//! Planar points and the Euclidean metric shared by both trees.
use std::fmt::{self, Debug, Display};
pub use num::Float;

pub trait Scalar: Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

/// Items that can be stored in a vantage point tree.
///
/// `distance` must be a metric (symmetric, non-negative, satisfying the
/// triangle inequality), otherwise pruned searches are not exact.
pub trait MetricItem<F: Scalar> {
    fn distance(&self, other: &Self) -> F;
}

/// An immutable point in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<F: Scalar = f64> {
    x: F,
    y: F,
}

impl<F: Scalar> Point<F> {
    pub fn new(x: F, y: F) -> Self {
        Point { x, y }
    }

    pub fn x(&self) -> F {
        self.x
    }

    pub fn y(&self) -> F {
        self.y
    }

    /// True when neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Scalar> From<(F, F)> for Point<F> {
    fn from((x, y): (F, F)) -> Self {
        Point::new(x, y)
    }
}

impl<F: Scalar> Display for Point<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x={}, y={})", self.x, self.y)
    }
}

/// Euclidean distance between two points.
///
/// Uses `hypot`, so the result only overflows when the true distance does.
pub fn distance<F: Scalar>(a: &Point<F>, b: &Point<F>) -> F {
    (a.x - b.x).hypot(a.y - b.y)
}

impl<F: Scalar> MetricItem<F> for Point<F> {
    fn distance(&self, other: &Self) -> F {
        distance(self, other)
    }
}
