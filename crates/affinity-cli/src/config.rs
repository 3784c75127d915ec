// crates/affinity-cli/src/config.rs
//
// Runtime configuration for the affinity CLI.
// Loaded from a TOML file or populated with defaults.

use std::fs;

use affinity_core::{EntityId, Rating};
use affinity_ratings::RatingParams;
use serde::Deserialize;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct AffinityConfig {
    /// Rating used when a partner cannot be resolved.
    #[serde(default = "default_rating")]
    pub default_rating: Rating,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overridden by RUST_LOG when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Soft-cap and reciprocal tuning.
    #[serde(default)]
    pub params: RatingParams,

    /// Entities the static policy can resolve, as `[[entity]]` tables.
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntitySpec>,
}

/// One resolvable entity and the feature score its ratings derive from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntitySpec {
    pub id: EntityId,
    pub score: f32,
}

fn default_rating() -> Rating {
    8.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            default_rating: default_rating(),
            log_level: default_log_level(),
            params: RatingParams::default(),
            entities: Vec::new(),
        }
    }
}

impl AffinityConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: AffinityConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
