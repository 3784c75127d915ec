// crates/affinity-core/src/traits.rs

use crate::{EntityId, Rating};

/// Source of seed ratings for first contact between two entities.
///
/// Implemented by the embedding application and injected into a
/// `RatingBook` at construction.
pub trait RatingPolicy: Send + Sync {
    /// Domain object a rating is computed from.
    type Entity;

    /// Rating used when a partner cannot be resolved, and the fallback
    /// returned by a ledger's baseline lookup.
    fn default_rating(&self) -> Rating;

    /// Look up an entity by id. `None` means the id is not resolvable.
    fn resolve_entity(&self, id: EntityId) -> Option<Self::Entity>;

    /// Compute the seed rating shared by both sides of a pair.
    ///
    /// Must give the same result for either argument order; one seed is
    /// written into both ledgers.
    fn calculate_rating(&self, a: &Self::Entity, b: &Self::Entity) -> Rating;
}
