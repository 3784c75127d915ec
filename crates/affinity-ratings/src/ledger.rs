// crates/affinity-ratings/src/ledger.rs
//
// Per-entity rating ledger.
//
// Each entry ratings[partner] holds how strongly this entity relates to
// `partner`. A missing entry means the two have never interacted; once an
// entry exists it is only ever adjusted or replaced wholesale by
// `deserialize`.

use affinity_core::{AffinityError, EntityId, Rating, RatingCell, SparseSequence};

use crate::codec;
use crate::soft_cap::capped_change;

fn slot(id: EntityId) -> usize {
    id as usize
}

/// Sparse ledger of ratings toward partners, indexed by partner id.
#[derive(Debug, Clone)]
pub struct RatingLedger {
    id: EntityId,
    ratings: SparseSequence<RatingCell>,
}

impl RatingLedger {
    /// Create an empty ledger for entity `id`.
    ///
    /// `default_rating` is what `baseline` returns until the entity's own
    /// slot has been written.
    pub fn new(id: EntityId, default_rating: Rating) -> Self {
        Self {
            id,
            ratings: SparseSequence::with_default(RatingCell::new(default_rating)),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The cached rating toward `partner`, without bootstrapping.
    pub fn rating_for(&self, partner: EntityId) -> Option<Rating> {
        self.ratings.get(slot(partner)).map(RatingCell::get)
    }

    pub fn has_rating(&self, partner: EntityId) -> bool {
        self.ratings.has(slot(partner))
    }

    /// The rating held at this entity's own slot, else the default rating.
    pub fn baseline(&self) -> Result<Rating, AffinityError> {
        Ok(self.ratings.get_or_default(slot(self.id))?.get())
    }

    /// Write `value` as the rating toward `partner`. Returns the previous rating.
    pub fn commit(&mut self, partner: EntityId, value: Rating) -> Option<Rating> {
        self.ratings
            .insert(slot(partner), RatingCell::new(value))
            .map(|cell| cell.get())
    }

    /// Write `value` toward `partner` unless a rating is already held there.
    /// Returns the rating held afterwards.
    pub fn seed(&mut self, partner: EntityId, value: Rating) -> Rating {
        self.ratings
            .get_or_insert_with(slot(partner), || RatingCell::new(value))
            .get()
    }

    /// Apply a soft-capped change to the rating toward `partner`.
    ///
    /// The cell is created with `seed` first if it does not exist yet.
    /// Returns the new rating.
    pub fn adjust(&mut self, partner: EntityId, seed: Rating, delta: Rating, center: Rating) -> Rating {
        let cell = self
            .ratings
            .get_or_insert_with(slot(partner), || RatingCell::new(seed));
        let change = capped_change(cell.get(), delta, center);
        cell.add_and_get(change)
    }

    /// `(partner, rating)` for every partner with a cached rating, by id.
    pub fn partners(&self) -> impl Iterator<Item = (EntityId, Rating)> + '_ {
        self.ratings
            .iter()
            .map(|(i, cell)| (i as EntityId, cell.get()))
    }

    /// One past the highest partner id with a rating.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Number of partners with a rating.
    pub fn occupied(&self) -> usize {
        self.ratings.occupied()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Encode the ledger in the fixed-point byte format.
    pub fn serialize(&self) -> Vec<u8> {
        let bytes = codec::encode_ledger(&self.ratings);
        tracing::debug!("Serialized ledger {} into {} bytes", self.id, bytes.len());
        bytes
    }

    /// Replace every rating with those decoded from `bytes`.
    pub fn deserialize(&mut self, bytes: &[u8]) {
        codec::decode_ledger(bytes, &mut self.ratings);
        tracing::debug!("Deserialized {} ratings into ledger {}", bytes.len(), self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = RatingLedger::new(3, 8.0);
        assert_eq!(ledger.id(), 3);
        assert!(ledger.is_empty());
        assert_eq!(ledger.rating_for(1), None);
        assert_eq!(ledger.partners().count(), 0);
    }

    #[test]
    fn baseline_falls_back_to_default() {
        let mut ledger = RatingLedger::new(2, 6.5);
        assert_eq!(ledger.baseline(), Ok(6.5));
        ledger.commit(5, 12.0);
        assert_eq!(ledger.baseline(), Ok(6.5));
        ledger.commit(2, 9.0);
        assert_eq!(ledger.baseline(), Ok(9.0));
    }

    #[test]
    fn commit_returns_previous() {
        let mut ledger = RatingLedger::new(0, 8.0);
        assert_eq!(ledger.commit(4, 3.0), None);
        assert_eq!(ledger.commit(4, 5.0), Some(3.0));
        assert_eq!(ledger.rating_for(4), Some(5.0));
        assert_eq!(ledger.occupied(), 1);
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn seed_keeps_existing_rating() {
        let mut ledger = RatingLedger::new(0, 8.0);
        assert_eq!(ledger.seed(3, 5.0), 5.0);
        assert_eq!(ledger.seed(3, 9.0), 5.0);
        assert_eq!(ledger.rating_for(3), Some(5.0));
        assert_eq!(ledger.occupied(), 1);
    }

    #[test]
    fn adjust_applies_soft_cap() {
        let mut ledger = RatingLedger::new(0, 8.0);
        ledger.commit(1, 8.0);
        assert_eq!(ledger.adjust(1, 0.0, 2.0, 8.0), 10.0);
        ledger.commit(2, 16.0);
        assert_eq!(ledger.adjust(2, 0.0, 2.0, 8.0), 16.0);
        ledger.commit(3, 0.0);
        assert_eq!(ledger.adjust(3, 0.0, 2.0, 8.0), 0.0);
    }

    #[test]
    fn adjust_seeds_missing_cell() {
        let mut ledger = RatingLedger::new(0, 8.0);
        let updated = ledger.adjust(7, 4.0, 1.0, 8.0);
        assert!((updated - 4.75).abs() < 1e-6);
        assert!(ledger.has_rating(7));
    }

    #[test]
    fn partners_in_id_order() {
        let mut ledger = RatingLedger::new(0, 8.0);
        ledger.commit(9, 1.0);
        ledger.commit(2, 2.0);
        let partners: Vec<_> = ledger.partners().collect();
        assert_eq!(partners, vec![(2, 2.0), (9, 1.0)]);
    }

    #[test]
    fn serialize_deserialize_round_trip() {
        let mut ledger = RatingLedger::new(1, 8.0);
        ledger.commit(0, 4.5);
        ledger.commit(2, 8.0625);
        ledger.commit(3, 15.0);
        let bytes = ledger.serialize();
        assert_eq!(bytes.len(), 4);

        let mut restored = RatingLedger::new(1, 8.0);
        restored.commit(10, 3.0);
        restored.deserialize(&bytes);
        assert_eq!(restored.rating_for(0), Some(4.5));
        assert_eq!(restored.rating_for(2), Some(8.0625));
        assert_eq!(restored.rating_for(3), Some(15.0));
        // The gap at 1 comes back as a literal zero rating.
        assert_eq!(restored.rating_for(1), Some(0.0));
        assert_eq!(restored.rating_for(10), None);
    }
}
