//! Loader configuration
//!
//! `LoaderConfig` holds everything a run needs: where the data and the
//! credentials live, which project and database to write to, and how the
//! HTTP client should behave. The CLI builds one from flags and environment;
//! library users can build one directly.

use crate::auth::{AuthConfig, ServiceAccountKey};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::store::{DEFAULT_DATABASE, FIRESTORE_BASE_URL, MAX_BATCH_WRITES};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default location of the seed file
pub const DEFAULT_DATA_PATH: &str = "./data.json";

/// Default location of the service account key
pub const DEFAULT_CREDENTIALS_PATH: &str = "./serviceAccountKey.json";

/// Token the Firestore emulator accepts as an admin credential
pub const EMULATOR_TOKEN: &str = "owner";

// ============================================================================
// LoaderConfig
// ============================================================================

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Seed file
    pub data_path: PathBuf,
    /// Service account key file
    pub credentials_path: PathBuf,
    /// Target project; falls back to the key's `project_id`
    pub project_id: Option<String>,
    /// Target database
    pub database_id: String,
    /// REST base URL override
    pub endpoint: Option<String>,
    /// `host:port` of a Firestore emulator
    pub emulator_host: Option<String>,
    /// Split collections into batches of this many writes
    pub batch_size: Option<usize>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Transport retries per commit
    pub max_retries: u32,
    /// Optional commit rate limit
    pub requests_per_second: Option<u32>,
    /// Validate and plan only
    pub dry_run: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            project_id: None,
            database_id: DEFAULT_DATABASE.to_string(),
            endpoint: None,
            emulator_host: None,
            batch_size: None,
            timeout: Duration::from_secs(30),
            max_retries: 0,
            requests_per_second: None,
            dry_run: false,
        }
    }
}

/// Which database to write to and how to authenticate
///
/// The REST base URL is not part of it; it travels in `http_config()`.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Project to write to
    pub project_id: String,
    /// Database to write to
    pub database_id: String,
    /// Request authentication
    pub auth: AuthConfig,
}

impl LoaderConfig {
    /// Check values that do not depend on files or the network
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.batch_size {
            if size == 0 || size > MAX_BATCH_WRITES {
                return Err(Error::invalid_value(
                    "batch_size",
                    format!("must be between 1 and {MAX_BATCH_WRITES}, got {size}"),
                ));
            }
        }

        if self.timeout.is_zero() {
            return Err(Error::invalid_value("timeout", "must be greater than zero"));
        }

        if self.database_id.is_empty() {
            return Err(Error::invalid_value("database", "cannot be empty"));
        }

        if let Some(endpoint) = &self.endpoint {
            let url = url::Url::parse(endpoint)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::invalid_value(
                    "endpoint",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
        }

        if matches!(self.requests_per_second, Some(0)) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Whether requests go to a local emulator
    pub fn uses_emulator(&self) -> bool {
        self.emulator_host.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// REST base URL: explicit endpoint, then emulator, then production
    pub fn base_url(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.trim_end_matches('/').to_string();
        }
        match self.emulator_host.as_deref().filter(|h| !h.is_empty()) {
            Some(host) => format!("http://{host}"),
            None => FIRESTORE_BASE_URL.to_string(),
        }
    }

    /// HTTP client settings for this run
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url())
            .timeout(self.timeout)
            .max_retries(self.max_retries);

        if let Some(rps) = self.requests_per_second.and_then(NonZeroU32::new) {
            builder = builder.rate_limit(rps);
        }
        builder.build()
    }

    /// Resolve the project, database and auth to use
    ///
    /// Against the emulator no key file is read and the project must be
    /// given explicitly. Otherwise the key file is loaded once here.
    pub fn resolve_connection(&self) -> Result<Connection> {
        self.validate()?;

        let (auth, key_project) = if self.uses_emulator() {
            debug!(host = ?self.emulator_host, "Using Firestore emulator");
            (
                AuthConfig::Bearer {
                    token: EMULATOR_TOKEN.to_string(),
                },
                None,
            )
        } else {
            let key = ServiceAccountKey::from_file(&self.credentials_path)?;
            debug!(
                client_email = %key.client_email,
                path = %self.credentials_path.display(),
                "Loaded service account key"
            );
            let project = key.project_id.clone();
            (AuthConfig::ServiceAccount(key), project)
        };

        let project_id = self
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .or(key_project)
            .ok_or_else(|| {
                Error::config(
                    "No project id: pass --project, set FIRESTORE_PROJECT_ID, \
                     or use a key file that contains project_id",
                )
            })?;

        Ok(Connection {
            project_id,
            database_id: self.database_id.clone(),
            auth,
        })
    }
}
