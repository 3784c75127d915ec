// crates/affinity-ratings/src/book.rs
//
// RatingBook: owns the injected policy and every live ledger, and performs
// the operations that touch two ledgers at once.
//
// First contact between two entities is split into a pure `compute_seed`
// query and an explicit `commit_seed` write, so the cross-ledger side effect
// is never hidden inside a read.

use affinity_core::{AffinityError, EntityId, Rating, RatingPolicy, SparseSequence};

use crate::ledger::RatingLedger;
use crate::params::RatingParams;

fn slot(id: EntityId) -> usize {
    id as usize
}

/// Where a seed rating must be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedScope {
    /// The owner already holds the rating; nothing to write.
    Cached,
    /// The partner could not be resolved; only the owner gets the default.
    OwnerOnly,
    /// Computed by the policy; both sides start from this value.
    Shared,
}

/// Result of `RatingBook::compute_seed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub owner: EntityId,
    pub partner: EntityId,
    pub value: Rating,
    pub scope: SeedScope,
}

/// Ledgers for every live entity, indexed by entity id.
///
/// An entity is live when its ledger is registered here. Resolvable
/// partners get a ledger on first contact.
#[derive(Debug)]
pub struct RatingBook<P: RatingPolicy> {
    policy: P,
    params: RatingParams,
    ledgers: SparseSequence<RatingLedger>,
}

impl<P: RatingPolicy> RatingBook<P> {
    /// Create a book with default parameters.
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            params: RatingParams::default(),
            ledgers: SparseSequence::new(),
        }
    }

    /// Create a book with explicit parameters, validating them first.
    pub fn with_params(policy: P, params: RatingParams) -> Result<Self, AffinityError> {
        params.validate()?;
        Ok(Self {
            policy,
            params,
            ledgers: SparseSequence::new(),
        })
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn params(&self) -> &RatingParams {
        &self.params
    }

    /// Create an empty ledger for `id` unless one exists.
    ///
    /// Returns `true` if a ledger was created.
    pub fn register(&mut self, id: EntityId) -> bool {
        if self.ledgers.has(slot(id)) {
            return false;
        }
        self.ledgers
            .insert(slot(id), RatingLedger::new(id, self.policy.default_rating()));
        tracing::debug!("Registered ledger for entity {}", id);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ledgers.has(slot(id))
    }

    pub fn ledger(&self, id: EntityId) -> Option<&RatingLedger> {
        self.ledgers.get(slot(id))
    }

    pub fn ledger_mut(&mut self, id: EntityId) -> Option<&mut RatingLedger> {
        self.ledgers.get_mut(slot(id))
    }

    /// Number of registered ledgers.
    pub fn len(&self) -> usize {
        self.ledgers.occupied()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.occupied() == 0
    }

    /// Registered entity ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ledgers.values().map(RatingLedger::id)
    }

    pub fn ledgers(&self) -> impl Iterator<Item = &RatingLedger> + '_ {
        self.ledgers.values()
    }

    fn owner_ledger(&self, id: EntityId) -> Result<&RatingLedger, AffinityError> {
        self.ledger(id).ok_or(AffinityError::UnknownEntity(id))
    }

    fn owner_ledger_mut(&mut self, id: EntityId) -> Result<&mut RatingLedger, AffinityError> {
        self.ledger_mut(id).ok_or(AffinityError::UnknownEntity(id))
    }

    /// Work out the rating `owner` should hold toward `partner`, without writing.
    ///
    /// Both entities must resolve through the policy for a computed seed,
    /// the owner included, since `calculate_rating` takes two resolved
    /// entities. Otherwise the policy's default rating is used for the
    /// owner alone.
    pub fn compute_seed(&self, owner: EntityId, partner: EntityId) -> Result<Seed, AffinityError> {
        let ledger = self.owner_ledger(owner)?;
        if let Some(value) = ledger.rating_for(partner) {
            return Ok(Seed {
                owner,
                partner,
                value,
                scope: SeedScope::Cached,
            });
        }

        let resolved = self.policy.resolve_entity(partner).and_then(|b| {
            self.policy.resolve_entity(owner).map(|a| (a, b))
        });
        let seed = match resolved {
            Some((a, b)) => Seed {
                owner,
                partner,
                value: self.policy.calculate_rating(&a, &b),
                scope: SeedScope::Shared,
            },
            None => Seed {
                owner,
                partner,
                value: self.policy.default_rating(),
                scope: SeedScope::OwnerOnly,
            },
        };
        Ok(seed)
    }

    /// Write a seed produced by `compute_seed`. Returns the rating the owner
    /// now holds toward the partner.
    ///
    /// Seeds only fill empty cells: a rating written since the seed was
    /// computed is kept and returned instead. A shared seed also goes into
    /// the partner's ledger at the owner's id, registering the partner if
    /// needed.
    pub fn commit_seed(&mut self, seed: Seed) -> Result<Rating, AffinityError> {
        let stored = match seed.scope {
            SeedScope::Cached => self.owner_ledger_mut(seed.owner)?.seed(seed.partner, seed.value),
            SeedScope::OwnerOnly => {
                let stored = self.owner_ledger_mut(seed.owner)?.seed(seed.partner, seed.value);
                tracing::debug!(
                    "Entity {} fell back to default rating {} toward {}",
                    seed.owner,
                    stored,
                    seed.partner
                );
                stored
            }
            SeedScope::Shared => {
                if !self.contains(seed.owner) {
                    return Err(AffinityError::UnknownEntity(seed.owner));
                }
                self.register(seed.partner);
                let (owner, partner) = self
                    .ledgers
                    .get_pair_mut(slot(seed.owner), slot(seed.partner));
                let owner = owner.ok_or(AffinityError::UnknownEntity(seed.owner))?;
                let stored = owner.seed(seed.partner, seed.value);
                if let Some(partner) = partner {
                    partner.seed(seed.owner, seed.value);
                }
                tracing::debug!(
                    "Seeded rating {} between {} and {}",
                    seed.value,
                    seed.owner,
                    seed.partner
                );
                stored
            }
        };
        Ok(stored)
    }

    /// The rating `owner` holds toward `partner`, bootstrapping it on first contact.
    pub fn rating(&mut self, owner: EntityId, partner: EntityId) -> Result<Rating, AffinityError> {
        let seed = self.compute_seed(owner, partner)?;
        self.commit_seed(seed)
    }

    /// The rating at `owner`'s own slot, else the default rating.
    pub fn baseline(&self, owner: EntityId) -> Result<Rating, AffinityError> {
        self.owner_ledger(owner)?.baseline()
    }

    fn edit(&mut self, owner: EntityId, partner: EntityId, delta: Rating) -> Result<Rating, AffinityError> {
        let seed = self.rating(owner, partner)?;
        let center = self.params.center;
        Ok(self
            .owner_ledger_mut(owner)?
            .adjust(partner, seed, delta, center))
    }

    /// Adjust `owner`'s rating toward `partner` by a soft-capped `delta`.
    ///
    /// When the partner is live, its rating toward `owner` also moves by
    /// `delta * reciprocal_factor`. Returns the owner's new rating.
    pub fn update_rating(
        &mut self,
        owner: EntityId,
        partner: EntityId,
        delta: Rating,
    ) -> Result<Rating, AffinityError> {
        let updated = self.edit(owner, partner, delta)?;
        if partner != owner && self.contains(partner) {
            let reciprocal = delta * self.params.reciprocal_factor;
            self.edit(partner, owner, reciprocal)?;
        }
        tracing::trace!("Entity {} updated rating toward {} by {}", owner, partner, delta);
        Ok(updated)
    }

    /// Adjust `owner`'s rating at its own slot by a soft-capped `delta`.
    pub fn update_baseline(&mut self, owner: EntityId, delta: Rating) -> Result<Rating, AffinityError> {
        let updated = self.edit(owner, owner, delta)?;
        tracing::trace!("Entity {} updated baseline rating by {}", owner, delta);
        Ok(updated)
    }

    /// Encode `owner`'s ledger in the fixed-point byte format.
    pub fn serialize(&self, owner: EntityId) -> Result<Vec<u8>, AffinityError> {
        Ok(self.owner_ledger(owner)?.serialize())
    }

    /// Replace `owner`'s ratings with those decoded from `bytes`,
    /// registering the owner if needed.
    pub fn deserialize(&mut self, owner: EntityId, bytes: &[u8]) -> Result<(), AffinityError> {
        self.register(owner);
        self.owner_ledger_mut(owner)?.deserialize(bytes);
        Ok(())
    }
}
