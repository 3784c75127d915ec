// crates/affinity-core/src/lib.rs
//
// affinity-core: Core types, sparse storage, and policy traits for
// pairwise affinity ratings.
//
// This is the leaf crate that the rest of the workspace depends on.
// It defines the id and rating aliases, the mutable rating cell, the
// auto-growing sparse sequence that backs every ledger, the error type,
// and the policy trait that supplies seed ratings.

pub mod cell;
pub mod error;
pub mod sequence;
pub mod traits;

/// Identifier of a rated entity. Shared by ledger indices and policy lookups.
pub type EntityId = u32;

/// A rating value. Nominally in `[0, 16)` with `8` as the neutral center.
pub type Rating = f32;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use affinity_core::SparseSequence;`

pub use cell::RatingCell;
pub use error::AffinityError;
pub use sequence::{SequenceCursor, SparseSequence};
pub use traits::RatingPolicy;
