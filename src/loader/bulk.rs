//! Batched collection upload

use super::types::{CollectionReport, UploadSummary};
use crate::error::{Error, Result};
use crate::store::{DocumentStore, WriteBatch, MAX_BATCH_WRITES};
use crate::types::{Dataset, Document};
use tracing::{debug, info};

/// Writes collections into a [`DocumentStore`]
pub struct BulkLoader<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    batch_size: Option<usize>,
}

impl<'a, S: DocumentStore + ?Sized> BulkLoader<'a, S> {
    /// Create a loader that commits each collection as a single batch
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            batch_size: None,
        }
    }

    /// Split collections into batches of at most `size` writes
    ///
    /// Atomicity then holds per batch, not per collection.
    pub fn with_batch_size(mut self, size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BATCH_WRITES {
            return Err(Error::invalid_value(
                "batch_size",
                format!("must be between 1 and {MAX_BATCH_WRITES}, got {size}"),
            ));
        }
        self.batch_size = Some(size);
        Ok(self)
    }

    /// Configured batch size, `None` when collections are not split
    pub fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    /// Build the batches that `upload` would commit for a collection
    ///
    /// Always yields at least one batch, so an empty collection still
    /// produces one (empty) commit.
    pub fn plan(&self, collection_name: &str, documents: &[Document]) -> Vec<WriteBatch> {
        let chunk_size = self.batch_size.unwrap_or(documents.len()).max(1);

        let mut batches: Vec<WriteBatch> = documents
            .chunks(chunk_size)
            .map(|chunk| {
                let mut batch = WriteBatch::new();
                for doc in chunk {
                    batch.set(collection_name, &doc.id, doc.body.clone());
                }
                batch
            })
            .collect();

        if batches.is_empty() {
            batches.push(WriteBatch::new());
        }
        batches
    }

    /// Upsert every document of one collection
    pub async fn upload(
        &self,
        collection_name: &str,
        documents: &[Document],
    ) -> Result<CollectionReport> {
        let batches = self.plan(collection_name, documents);
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            debug!(
                collection = collection_name,
                batch = index + 1,
                of = total,
                writes = batch.len(),
                "Committing"
            );
            self.store
                .commit(batch)
                .await
                .map_err(|e| Error::commit(collection_name, e.to_string()))?;
        }

        info!(
            collection = collection_name,
            documents = documents.len(),
            batches = total,
            "Collection committed"
        );

        Ok(CollectionReport {
            name: collection_name.to_string(),
            documents: documents.len(),
            batches: total,
        })
    }

    /// Upload every collection of `dataset` in order
    ///
    /// `on_committed` runs after each collection commits, before the next
    /// one starts. The first error, from a commit or from the callback, is
    /// returned as is and nothing after it is sent.
    pub async fn upload_all<F>(&self, dataset: &Dataset, mut on_committed: F) -> Result<UploadSummary>
    where
        F: FnMut(&CollectionReport) -> Result<()>,
    {
        let mut summary = UploadSummary::default();

        for collection in &dataset.collections {
            let report = self.upload(&collection.name, &collection.documents).await?;
            on_committed(&report)?;
            summary.collections.push(report);
        }

        info!(
            collections = summary.collections.len(),
            documents = summary.documents(),
            batches = summary.batches(),
            "Upload finished"
        );
        Ok(summary)
    }
}
