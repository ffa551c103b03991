//! Document store module
//!
//! The loader talks to the database through the [`DocumentStore`] trait,
//! which has a single operation: commit a [`WriteBatch`] atomically.
//!
//! # Implementations
//!
//! - [`FirestoreStore`] - Cloud Firestore over the REST `documents:commit` endpoint
//! - [`MemoryStore`] - in-process store, used for dry runs and tests
//!
//! # Wire format
//!
//! Document bodies are plain JSON objects in memory and are converted to
//! Firestore's typed values (`stringValue`, `integerValue`, `mapValue`, ...)
//! only when a batch is serialized for the REST API.

mod firestore;
mod memory;
mod types;
mod value;

pub use firestore::{FirestoreStore, DEFAULT_DATABASE, FIRESTORE_BASE_URL};
pub use memory::MemoryStore;
pub use types::{CommitResponse, DocumentStore, Write, WriteBatch, WriteResult, MAX_BATCH_WRITES};
pub use value::{encode_fields, encode_value};
