//! Store types: batches, writes and the store trait

use crate::error::Result;
use crate::types::DocumentBody;
use async_trait::async_trait;
use serde::Deserialize;

/// Largest number of writes Firestore accepts in one commit
pub const MAX_BATCH_WRITES: usize = 500;

/// A single staged write
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Create or fully overwrite the document at `collection/document_id`
    Set {
        collection: String,
        document_id: String,
        body: DocumentBody,
    },
}

impl Write {
    /// Collection the write targets
    pub fn collection(&self) -> &str {
        match self {
            Write::Set { collection, .. } => collection,
        }
    }

    /// Path of the target document relative to the database root
    pub fn document_path(&self) -> String {
        match self {
            Write::Set {
                collection,
                document_id,
                ..
            } => format!("{collection}/{document_id}"),
        }
    }
}

/// An ordered set of writes committed as one atomic unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an upsert of `body` at `collection/document_id`
    pub fn set(
        &mut self,
        collection: impl Into<String>,
        document_id: impl Into<String>,
        body: DocumentBody,
    ) -> &mut Self {
        self.writes.push(Write::Set {
            collection: collection.into(),
            document_id: document_id.into(),
            body,
        });
        self
    }

    /// Staged writes in order
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Number of staged writes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Result of one applied write
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    /// Last update time of the document after the write
    #[serde(default)]
    pub update_time: Option<String>,
}

/// Result of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    /// One result per write, in batch order
    #[serde(default)]
    pub write_results: Vec<WriteResult>,
    /// Time the commit was applied
    #[serde(default)]
    pub commit_time: Option<String>,
}

/// A document database that applies write batches atomically
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Apply every write in `batch`, or none of them
    async fn commit(&self, batch: &WriteBatch) -> Result<CommitResponse>;
}
