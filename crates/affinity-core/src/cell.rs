// crates/affinity-core/src/cell.rs
//
// Mutable rating cell stored in ledgers.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Rating;

/// A mutable float box with get/set/add semantics.
///
/// Equality compares bit patterns, so `NaN == NaN` and `0.0 != -0.0`.
/// Ordering uses `f32::total_cmp`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingCell {
    value: Rating,
}

impl RatingCell {
    pub fn new(value: Rating) -> Self {
        Self { value }
    }

    pub fn get(&self) -> Rating {
        self.value
    }

    pub fn set(&mut self, value: Rating) {
        self.value = value;
    }

    pub fn add(&mut self, operand: Rating) {
        self.value += operand;
    }

    /// Add `operand` and return the new value.
    pub fn add_and_get(&mut self, operand: Rating) -> Rating {
        self.value += operand;
        self.value
    }

    /// Add `operand` and return the value held before the addition.
    pub fn get_and_add(&mut self, operand: Rating) -> Rating {
        let last = self.value;
        self.value += operand;
        last
    }
}

impl From<Rating> for RatingCell {
    fn from(value: Rating) -> Self {
        Self::new(value)
    }
}

impl PartialEq for RatingCell {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for RatingCell {}

impl PartialOrd for RatingCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RatingCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl fmt::Display for RatingCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
