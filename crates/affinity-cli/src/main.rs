// crates/affinity-cli/src/main.rs
//
// CLI entrypoint for the affinity rating tools.
//
// Provides subcommands for decoding and encoding ledger files and for
// replaying interaction scripts against a configured rating book.

mod commands;
mod config;
mod output;
mod policy;

use clap::{Parser, Subcommand};
use commands::decode::DecodeArgs;
use commands::encode::EncodeArgs;
use commands::replay::ReplayArgs;
use config::AffinityConfig;
use output::OutputFormat;

/// Affinity CLI: inspect and exercise pairwise rating ledgers.
#[derive(Parser, Debug)]
#[command(
    name = "affinity",
    version = "0.1.0",
    about = "Affinity CLI for pairwise rating ledgers"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "affinity.toml")]
    config: String,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the ratings stored in a ledger file.
    Decode(DecodeArgs),

    /// Write a ledger file from partner ratings.
    Encode(EncodeArgs),

    /// Run an interaction script and print the resulting ledgers.
    Replay(ReplayArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load before initializing tracing so the configured level can serve
    // as the fallback filter.
    let loaded = AffinityConfig::load(&cli.config);
    let fallback_level = match &loaded {
        Ok(cfg) => cfg.log_level.clone(),
        Err(_) => "info".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_level)),
        )
        .init();

    let config = match loaded {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", cli.config);
            cfg
        }
        Err(e) => {
            tracing::warn!(
                "Could not load config from {}: {}. Using defaults.",
                cli.config,
                e
            );
            AffinityConfig::default()
        }
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    match &cli.command {
        Commands::Decode(args) => commands::decode::run(args, &config, format)?,
        Commands::Encode(args) => commands::encode::run(args, &config, format)?,
        Commands::Replay(args) => commands::replay::run(args, &config, format)?,
    }

    Ok(())
}
