//! In-process document store
//!
//! Applies batches to a map held in memory. The runner uses it for
//! `--dry-run`; tests use it to observe what the loader wrote and to
//! inject commit failures.

use super::types::{CommitResponse, DocumentStore, Write, WriteBatch, WriteResult};
use crate::error::{Error, Result};
use crate::types::DocumentBody;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

type Documents = BTreeMap<String, BTreeMap<String, DocumentBody>>;

#[derive(Debug, Default)]
struct Inner {
    documents: Documents,
    commits: Vec<WriteBatch>,
}

/// Document store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_collections: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any batch that writes to `collection`
    #[must_use]
    pub fn fail_on(mut self, collection: impl Into<String>) -> Self {
        self.fail_collections.insert(collection.into());
        self
    }

    /// Read a document
    pub fn get(&self, collection: &str, document_id: &str) -> Option<DocumentBody> {
        self.lock()
            .documents
            .get(collection)
            .and_then(|docs| docs.get(document_id))
            .cloned()
    }

    /// Number of documents stored in `collection`
    pub fn count(&self, collection: &str) -> usize {
        self.lock().documents.get(collection).map_or(0, BTreeMap::len)
    }

    /// Every successfully committed batch, in commit order
    pub fn commits(&self) -> Vec<WriteBatch> {
        self.lock().commits.clone()
    }

    /// Snapshot of all stored documents
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, DocumentBody>> {
        self.lock().documents.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Inserts cannot panic, so a poisoned map is still consistent
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn commit(&self, batch: &WriteBatch) -> Result<CommitResponse> {
        if let Some(write) = batch
            .writes()
            .iter()
            .find(|w| self.fail_collections.contains(w.collection()))
        {
            return Err(Error::http_status(
                503,
                format!("UNAVAILABLE: simulated failure writing {}", write.document_path()),
            ));
        }

        let mut inner = self.lock();
        let update_time = Utc::now().to_rfc3339();

        for write in batch.writes() {
            match write {
                Write::Set {
                    collection,
                    document_id,
                    body,
                } => {
                    inner
                        .documents
                        .entry(collection.clone())
                        .or_default()
                        .insert(document_id.clone(), body.clone());
                }
            }
        }
        inner.commits.push(batch.clone());

        Ok(CommitResponse {
            write_results: vec![
                WriteResult {
                    update_time: Some(update_time.clone()),
                };
                batch.len()
            ],
            commit_time: Some(update_time),
        })
    }
}
