// crates/affinity-ratings/src/params.rs
//
// Tuning parameters for rating updates.

use affinity_core::{AffinityError, Rating};
use serde::{Deserialize, Serialize};

/// Parameters shared by every ledger in a `RatingBook`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingParams {
    /// Soft-cap center. The nominal scale is `[0, 2 * center)`. Default: 8.0.
    #[serde(default = "default_center")]
    pub center: Rating,
    /// Share of a pairwise delta applied to the partner's reciprocal cell. Default: 0.5.
    #[serde(default = "default_reciprocal_factor")]
    pub reciprocal_factor: Rating,
}

fn default_center() -> Rating {
    8.0
}

fn default_reciprocal_factor() -> Rating {
    0.5
}

impl Default for RatingParams {
    fn default() -> Self {
        Self {
            center: default_center(),
            reciprocal_factor: default_reciprocal_factor(),
        }
    }
}

impl RatingParams {
    /// Reject parameters that would make the soft cap meaningless.
    pub fn validate(&self) -> Result<(), AffinityError> {
        if !self.center.is_finite() || self.center <= 0.0 {
            return Err(AffinityError::Configuration(format!(
                "center must be finite and positive, got {}",
                self.center
            )));
        }
        if !self.reciprocal_factor.is_finite() {
            return Err(AffinityError::Configuration(format!(
                "reciprocal_factor must be finite, got {}",
                self.reciprocal_factor
            )));
        }
        Ok(())
    }
}
