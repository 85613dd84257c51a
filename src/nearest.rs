use std::fmt::{self, Display};

use crate::point::Scalar;

/// A stored item together with its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a, F: Scalar, T> {
    pub item: &'a T,
    pub distance: F,
}

impl<'a, F: Scalar, T> Nearest<'a, F, T> {
    pub fn new(item: &'a T, distance: F) -> Self {
        Nearest { item, distance }
    }

    /// Keep whichever of `self` and `other` is strictly closer; ties keep `self`.
    pub fn closer(self, other: Self) -> Self {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }

    pub fn into_pair(self) -> (&'a T, F) {
        (self.item, self.distance)
    }
}

impl<'a, F: Scalar, T: Display> Display for Nearest<'a, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at {}", self.item, self.distance)
    }
}
