// crates/affinity-ratings/src/soft_cap.rs
//
// Soft cap applied to every rating adjustment.
//
// With t = rating / center - 1, a change is scaled by f = 1 - t^2. The factor
// is 1 at the center, 0 at 0 and 2*center, and negative beyond them, which
// pulls out-of-range ratings back toward the scale.

use affinity_core::Rating;

/// Scale factor for a change applied to `rating`.
pub fn cap_factor(rating: Rating, center: Rating) -> Rating {
    let t = rating / center - 1.0;
    1.0 - t * t
}

/// The change actually applied when `delta` is requested at `rating`.
pub fn capped_change(rating: Rating, delta: Rating, center: Rating) -> Rating {
    delta * cap_factor(rating, center)
}
