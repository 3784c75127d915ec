// crates/affinity-cli/src/output.rs
//
// Output formatting utilities for the affinity CLI.
// Supports table and JSON output modes.

use affinity_core::{EntityId, Rating};
use affinity_ratings::RatingLedger;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// One cached rating, as printed by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RatingRow {
    pub owner: EntityId,
    pub partner: EntityId,
    pub rating: Rating,
}

/// Flatten a ledger into rows in partner order.
pub fn ledger_rows(ledger: &RatingLedger) -> Vec<RatingRow> {
    ledger
        .partners()
        .map(|(partner, rating)| RatingRow {
            owner: ledger.id(),
            partner,
            rating,
        })
        .collect()
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Print rating rows in the requested format.
pub fn print_rows(rows: &[RatingRow], format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", format_table(rows)),
        OutputFormat::Json => println!("{}", format_json(&rows)),
    }
}
