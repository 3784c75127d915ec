// crates/affinity-cli/src/commands/decode.rs
//
// `affinity decode <file>`: print the ratings stored in a ledger file.

use std::path::{Path, PathBuf};

use affinity_core::{AffinityError, EntityId, Rating};
use affinity_ratings::RatingLedger;
use clap::Args;

use crate::config::AffinityConfig;
use crate::output::{ledger_rows, print_rows, OutputFormat};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Ledger file in the fixed-point byte format.
    pub file: PathBuf,
    /// Entity id that owns the ledger.
    #[arg(long, default_value_t = 0)]
    pub owner: EntityId,
}

/// Read the ledger file at `path` as `owner`'s ratings.
pub fn read_ledger(
    path: &Path,
    owner: EntityId,
    default_rating: Rating,
) -> Result<RatingLedger, AffinityError> {
    let bytes = std::fs::read(path)?;
    let mut ledger = RatingLedger::new(owner, default_rating);
    ledger.deserialize(&bytes);
    Ok(ledger)
}

/// Run the decode subcommand.
pub fn run(
    args: &DecodeArgs,
    config: &AffinityConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = read_ledger(&args.file, args.owner, config.default_rating)?;
    tracing::info!("Decoded {} ratings from {}", ledger.occupied(), args.file.display());
    print_rows(&ledger_rows(&ledger), format);
    Ok(())
}
