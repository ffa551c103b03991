//! CLI arguments and parsing

use crate::config::{LoaderConfig, DEFAULT_CREDENTIALS_PATH, DEFAULT_DATA_PATH};
use crate::store::DEFAULT_DATABASE;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Seed Firestore collections from a JSON file
///
/// Every top-level key of the data file is a collection; every entry under
/// it is a document id mapped to its fields. Each collection is written
/// with one batched commit, in file order.
#[derive(Parser, Debug)]
#[command(name = "firestore-seed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data file (JSON)
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Service account key file (JSON)
    #[arg(
        short,
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        default_value = DEFAULT_CREDENTIALS_PATH
    )]
    pub credentials: PathBuf,

    /// Project id (defaults to the key's project_id)
    #[arg(short, long, env = "FIRESTORE_PROJECT_ID")]
    pub project: Option<String>,

    /// Database id
    #[arg(long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// REST endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Firestore emulator host:port (uses the emulator's admin token)
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    /// Split collections into batches of at most N writes (1-500)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Retries per commit on transient failures
    #[arg(long, default_value = "0")]
    pub max_retries: u32,

    /// Maximum commits per second
    #[arg(long)]
    pub rate_limit: Option<u32>,

    /// Validate the data file and show what would be written
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the loader configuration from parsed arguments
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            data_path: self.data.clone(),
            credentials_path: self.credentials.clone(),
            project_id: self.project.clone(),
            database_id: self.database.clone(),
            endpoint: self.endpoint.clone(),
            emulator_host: self.emulator_host.clone(),
            batch_size: self.batch_size,
            timeout: Duration::from_secs(self.timeout),
            max_retries: self.max_retries,
            requests_per_second: self.rate_limit,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "firestore-seed",
            "--data",
            "seed.json",
            "--credentials",
            "key.json",
            "--project",
            "demo",
            "--batch-size",
            "100",
            "--max-retries",
            "2",
            "--timeout",
            "10",
            "--dry-run",
        ])
        .unwrap();

        let config = cli.loader_config();
        assert_eq!(config.data_path, PathBuf::from("seed.json"));
        assert_eq!(config.credentials_path, PathBuf::from("key.json"));
        assert_eq!(config.project_id.as_deref(), Some("demo"));
        assert_eq!(config.batch_size, Some(100));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_rejects_non_numeric_batch_size() {
        let result = Cli::try_parse_from(["firestore-seed", "--batch-size", "lots"]);
        assert!(result.is_err());
    }
}
