//! Common types used throughout firestore-seed
//!
//! This module contains the in-memory shape of the input file
//! and a few shared type aliases.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type (insertion ordered, `preserve_order` is enabled)
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Body of a single document: field name to value
pub type DocumentBody = JsonObject;

// ============================================================================
// Dataset
// ============================================================================

/// A single document staged for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identifier within its collection
    pub id: String,
    /// Document fields
    pub body: DocumentBody,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, body: DocumentBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// A named collection and its documents, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collection name (may be a slash-separated subcollection path)
    pub name: String,
    /// Documents in the order they appear in the input
    pub documents: Vec<Document>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Add a document
    #[must_use]
    pub fn with_document(mut self, id: impl Into<String>, body: DocumentBody) -> Self {
        self.documents.push(Document::new(id, body));
        self
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection has no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// The parsed input file: collections in file key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Collections in the order they appear in the input
    pub collections: Vec<Collection>,
}

impl Dataset {
    /// Collection names in upload order
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total number of documents across all collections
    pub fn document_count(&self) -> usize {
        self.collections.iter().map(Collection::len).sum()
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: JsonValue) -> DocumentBody {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_dataset_counts_and_order() {
        let dataset = Dataset {
            collections: vec![
                Collection::new("users")
                    .with_document("u1", body(json!({"name": "Ann"})))
                    .with_document("u2", body(json!({"name": "Bo"}))),
                Collection::new("posts").with_document("p1", body(json!({"title": "Hi"}))),
            ],
        };

        assert_eq!(dataset.collection_names(), vec!["users", "posts"]);
        assert_eq!(dataset.document_count(), 3);
        assert_eq!(dataset.collection("posts").unwrap().len(), 1);
        assert!(dataset.collection("missing").is_none());
    }
}
