//! JSON parser for seed files
//!
//! Parses the seed file and validates that it has the
//! collection → document → fields shape.

use crate::error::{Error, Result};
use crate::types::{Collection, Dataset, Document, JsonValue};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a dataset from a JSON file on disk
///
/// # Examples
///
/// ```ignore
/// let dataset = load_dataset("./data.json")?;
/// for collection in &dataset.collections {
///     println!("{}: {} documents", collection.name, collection.len());
/// }
/// ```
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::dataset(format!(
                "Failed to read data file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    let dataset = load_dataset_from_str(&content)?;
    debug!(
        path = %path.display(),
        collections = dataset.collections.len(),
        documents = dataset.document_count(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Load a dataset from a JSON string
pub fn load_dataset_from_str(json: &str) -> Result<Dataset> {
    let value: JsonValue = serde_json::from_str(json)?;
    load_dataset_from_value(value)
}

/// Build a dataset from an already parsed JSON value
pub fn load_dataset_from_value(value: JsonValue) -> Result<Dataset> {
    let root = match value {
        JsonValue::Object(root) => root,
        other => {
            return Err(Error::dataset(format!(
                "root must be an object of collections, found {}",
                kind_of(&other)
            )));
        }
    };

    let mut collections = Vec::with_capacity(root.len());
    for (name, contents) in root {
        collections.push(parse_collection(name, contents)?);
    }

    Ok(Dataset { collections })
}

/// Parse one top-level entry into a collection
fn parse_collection(name: String, contents: JsonValue) -> Result<Collection> {
    let entries = match contents {
        JsonValue::Object(entries) => entries,
        other => {
            return Err(Error::dataset(format!(
                "collection '{name}' must be an object of documents, found {}",
                kind_of(&other)
            )));
        }
    };

    let mut documents = Vec::with_capacity(entries.len());
    for (id, body) in entries {
        match body {
            JsonValue::Object(fields) => documents.push(Document::new(id, fields)),
            other => {
                return Err(Error::dataset(format!(
                    "document '{name}/{id}' must be an object, found {}",
                    kind_of(&other)
                )));
            }
        }
    }

    Ok(Collection { name, documents })
}

/// Human readable JSON type name for error messages
fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
