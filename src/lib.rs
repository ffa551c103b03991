//! # firestore-seed
//!
//! Seed Cloud Firestore collections from a local JSON file.
//!
//! The data file maps collection names to documents:
//!
//! ```json
//! {
//!   "users": { "u1": { "name": "Ann" } },
//!   "posts": { "p1": { "title": "Hi" } }
//! }
//! ```
//!
//! Each collection is written with one batched commit (create or overwrite
//! every document), strictly in file order. The first failed commit stops
//! the run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use firestore_seed::{load_dataset, BulkLoader, FirestoreStore, HttpClient, LoaderConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = LoaderConfig::default();
//!     let connection = config.resolve_connection()?;
//!
//!     let http = HttpClient::with_auth(config.http_config(), connection.auth)?;
//!     let store = FirestoreStore::new(http, connection.project_id, connection.database_id)?;
//!
//!     let dataset = load_dataset(&config.data_path)?;
//!     BulkLoader::new(&store)
//!         .upload_all(&dataset, |report| {
//!             println!("Uploaded {}", report.name);
//!             Ok(())
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   data.json ──► dataset ──► loader ──► store ──► http ──► Firestore REST
//!                               │          │         │
//!                          WriteBatch   encoding    auth (service account JWT)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Seed file parsing
pub mod dataset;

/// Authentication (service account, bearer)
pub mod auth;

/// HTTP client with optional retry and rate limiting
pub mod http;

/// Document store trait and implementations
pub mod store;

/// Batched collection upload
pub mod loader;

/// Run configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{Connection, LoaderConfig};
pub use dataset::{load_dataset, load_dataset_from_str};
pub use error::{Error, Result};
pub use http::HttpClient;
pub use loader::{BulkLoader, CollectionReport, UploadSummary};
pub use store::{DocumentStore, FirestoreStore, MemoryStore, WriteBatch};
pub use types::{Collection, Dataset, Document, DocumentBody};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
