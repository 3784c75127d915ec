// crates/affinity-cli/src/commands/mod.rs
//
// Command module declarations for the affinity CLI.

pub mod decode;
pub mod encode;
pub mod replay;
