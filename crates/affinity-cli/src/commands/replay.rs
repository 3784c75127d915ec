// crates/affinity-cli/src/commands/replay.rs
//
// `affinity replay <script>`: run an interaction script against a rating
// book seeded by the configured entities, then print every ledger.
//
// Script format (TOML):
// ```text
// [[step]]
// owner = 1
// partner = 2     # omit to adjust the owner's baseline
// delta = 1.5
// ```

use std::path::{Path, PathBuf};

use affinity_core::{AffinityError, EntityId, Rating};
use affinity_ratings::RatingBook;
use clap::Args;
use serde::Deserialize;

use crate::config::AffinityConfig;
use crate::output::{ledger_rows, print_rows, OutputFormat};
use crate::policy::StaticPolicy;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Interaction script.
    pub script: PathBuf,
    /// Directory to write `<id>.ratings` ledger files into.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// A parsed interaction script.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default, rename = "step")]
    pub steps: Vec<ReplayStep>,
}

/// One rating update.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    pub owner: EntityId,
    #[serde(default)]
    pub partner: Option<EntityId>,
    pub delta: Rating,
}

impl ReplayScript {
    pub fn parse(contents: &str) -> Result<Self, AffinityError> {
        toml::from_str(contents).map_err(|e| AffinityError::Codec(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, AffinityError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }
}

/// Apply every step of `script` to a fresh book.
///
/// Configured entities are registered up front; step owners that are not
/// configured get a ledger on their first step.
pub fn replay(
    config: &AffinityConfig,
    script: &ReplayScript,
) -> Result<RatingBook<StaticPolicy>, AffinityError> {
    let policy = StaticPolicy::from_config(config);
    let ids: Vec<EntityId> = policy.entity_ids().collect();
    let mut book = RatingBook::with_params(policy, config.params)?;
    for id in ids {
        book.register(id);
    }

    for (i, step) in script.steps.iter().enumerate() {
        book.register(step.owner);
        let rating = match step.partner {
            Some(partner) => book.update_rating(step.owner, partner, step.delta)?,
            None => book.update_baseline(step.owner, step.delta)?,
        };
        tracing::debug!("Step {}: entity {} now at {}", i, step.owner, rating);
    }
    Ok(book)
}

/// Write every ledger in `book` to `dir` as `<id>.ratings`.
pub fn write_ledgers(dir: &Path, book: &RatingBook<StaticPolicy>) -> Result<(), AffinityError> {
    std::fs::create_dir_all(dir)?;
    for ledger in book.ledgers() {
        std::fs::write(dir.join(format!("{}.ratings", ledger.id())), ledger.serialize())?;
    }
    Ok(())
}

/// Run the replay subcommand.
pub fn run(
    args: &ReplayArgs,
    config: &AffinityConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let script = ReplayScript::load(&args.script)?;
    let book = replay(config, &script)?;
    tracing::info!(
        "Replayed {} steps across {} ledgers",
        script.steps.len(),
        book.len()
    );

    if let Some(dir) = &args.out {
        write_ledgers(dir, &book)?;
        tracing::info!("Wrote {} ledger files to {}", book.len(), dir.display());
    }

    let rows: Vec<_> = book.ledgers().flat_map(ledger_rows).collect();
    print_rows(&rows, format);
    Ok(())
}
