//! CLI module
//!
//! Command-line interface for seeding a database.
//!
//! # Output
//!
//! - stdout: `Uploaded <collection>` after each commit, then `All data uploaded`
//! - stderr: tracing logs and, on failure, `Error: <message>`

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
