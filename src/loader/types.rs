//! Loader result types

/// Outcome of uploading one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    /// Collection name
    pub name: String,
    /// Documents written
    pub documents: usize,
    /// Batches committed
    pub batches: usize,
}

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Per-collection reports, in upload order
    pub collections: Vec<CollectionReport>,
}

impl UploadSummary {
    /// Total documents written
    pub fn documents(&self) -> usize {
        self.collections.iter().map(|c| c.documents).sum()
    }

    /// Total batches committed
    pub fn batches(&self) -> usize {
        self.collections.iter().map(|c| c.batches).sum()
    }
}
