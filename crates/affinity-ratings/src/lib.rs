// crates/affinity-ratings/src/lib.rs
//
// affinity-ratings: Per-entity rating ledgers, soft-capped updates, and the
// fixed-point ledger codec.
//
// Each entity owns a ledger of ratings indexed by partner id. A rating is
// computed lazily the first time two entities meet and adjusted in place
// afterwards, with a soft cap that damps changes near the ends of the scale.

pub mod book;
pub mod codec;
pub mod ledger;
pub mod params;
pub mod soft_cap;

pub use book::{RatingBook, Seed, SeedScope};
pub use ledger::RatingLedger;
pub use params::RatingParams;
