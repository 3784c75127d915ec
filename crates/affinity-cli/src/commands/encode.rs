// crates/affinity-cli/src/commands/encode.rs
//
// `affinity encode <file> --rating <id>=<value>...`: write a ledger file.

use std::path::{Path, PathBuf};

use affinity_core::{AffinityError, EntityId, Rating};
use affinity_ratings::RatingLedger;
use clap::Args;

use crate::config::AffinityConfig;
use crate::output::{ledger_rows, print_rows, OutputFormat};

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Destination ledger file.
    pub file: PathBuf,
    /// Entity id that owns the ledger.
    #[arg(long, default_value_t = 0)]
    pub owner: EntityId,
    /// A partner rating as `<partner>=<rating>`. Repeatable.
    #[arg(long = "rating", value_parser = parse_rating)]
    pub ratings: Vec<(EntityId, Rating)>,
}

/// Parse `<partner>=<rating>`.
fn parse_rating(s: &str) -> Result<(EntityId, Rating), String> {
    let (partner, rating) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <partner>=<rating>, got '{}'", s))?;
    let partner = partner
        .trim()
        .parse::<EntityId>()
        .map_err(|e| format!("invalid partner id '{}': {}", partner, e))?;
    let rating = rating
        .trim()
        .parse::<Rating>()
        .map_err(|e| format!("invalid rating '{}': {}", rating, e))?;
    Ok((partner, rating))
}

/// Write `ledger` to `path` in the fixed-point byte format. Returns the bytes written.
pub fn write_ledger(path: &Path, ledger: &RatingLedger) -> Result<Vec<u8>, AffinityError> {
    let bytes = ledger.serialize();
    std::fs::write(path, &bytes)?;
    Ok(bytes)
}

/// Run the encode subcommand.
pub fn run(
    args: &EncodeArgs,
    config: &AffinityConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = RatingLedger::new(args.owner, config.default_rating);
    for &(partner, rating) in &args.ratings {
        ledger.commit(partner, rating);
    }
    let bytes = write_ledger(&args.file, &ledger)?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), args.file.display());

    // Show what a reader will get back, after quantization.
    let mut stored = RatingLedger::new(args.owner, config.default_rating);
    stored.deserialize(&bytes);
    print_rows(&ledger_rows(&stored), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair() {
        assert_eq!(parse_rating("3=4.5"), Ok((3, 4.5)));
        assert_eq!(parse_rating(" 12 = 8 "), Ok((12, 8.0)));
    }

    #[test]
    fn written_ledger_reads_back() {
        let path =
            std::env::temp_dir().join(format!("affinity_encode_{}.ratings", std::process::id()));
        let mut ledger = RatingLedger::new(0, 8.0);
        ledger.commit(2, 4.5);
        assert_eq!(write_ledger(&path, &ledger), Ok(vec![0, 0, 72]));

        let restored = crate::commands::decode::read_ledger(&path, 0, 8.0).unwrap();
        assert_eq!(restored.rating_for(2), Some(4.5));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let path = std::env::temp_dir()
            .join(format!("affinity_no_such_dir_{}", std::process::id()))
            .join("0.ratings");
        let ledger = RatingLedger::new(0, 8.0);
        assert!(matches!(write_ledger(&path, &ledger), Err(AffinityError::Io(_))));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_rating("3").is_err());
        assert!(parse_rating("x=1.0").is_err());
        assert!(parse_rating("3=high").is_err());
        assert!(parse_rating("-1=2.0").is_err());
    }
}
