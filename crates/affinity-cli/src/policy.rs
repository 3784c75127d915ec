// crates/affinity-cli/src/policy.rs
//
// Table-driven rating policy built from the CLI configuration.

use std::collections::HashMap;

use affinity_core::{EntityId, Rating, RatingPolicy};
use affinity_ratings::codec::QUANTUM;

use crate::config::AffinityConfig;

/// Resolves the configured entities and seeds ratings from their scores.
///
/// The seed for a pair is `2 * center - |score_a - score_b|`, kept inside
/// the encodable range `[0, 2 * center - 1/16]`. Equal scores seed at the
/// top of the scale; scores `center` apart seed at the center.
#[derive(Debug, Clone)]
pub struct StaticPolicy {
    default_rating: Rating,
    center: Rating,
    scores: HashMap<EntityId, f32>,
}

impl StaticPolicy {
    pub fn from_config(config: &AffinityConfig) -> Self {
        Self {
            default_rating: config.default_rating,
            center: config.params.center,
            scores: config.entities.iter().map(|e| (e.id, e.score)).collect(),
        }
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.scores.keys().copied()
    }
}

impl RatingPolicy for StaticPolicy {
    type Entity = f32;

    fn default_rating(&self) -> Rating {
        self.default_rating
    }

    fn resolve_entity(&self, id: EntityId) -> Option<f32> {
        self.scores.get(&id).copied()
    }

    fn calculate_rating(&self, a: &f32, b: &f32) -> Rating {
        let top = 2.0 * self.center;
        // A center below half a step leaves no encodable rating above zero.
        (top - (a - b).abs()).min(top - QUANTUM).max(0.0)
    }
}
