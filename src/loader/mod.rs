//! Bulk loader
//!
//! Uploads a [`Dataset`](crate::types::Dataset) collection by collection.
//!
//! # Guarantees
//!
//! - Collections are uploaded strictly one at a time, in file order
//! - Each collection is one atomic batch unless a batch size is set
//! - The first failed commit stops the run; later collections are not attempted

mod bulk;
mod types;

pub use bulk::BulkLoader;
pub use types::{CollectionReport, UploadSummary};

#[cfg(test)]
mod tests;
