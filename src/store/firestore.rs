//! Cloud Firestore REST store
//!
//! Commits batches through
//! `POST /v1/projects/{project}/databases/{database}/documents:commit`.
//! A write carrying only `update` (no mask, no precondition) replaces the
//! whole document, creating it when absent.

use super::types::{CommitResponse, DocumentStore, Write, WriteBatch};
use super::value::encode_fields;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Production Firestore endpoint
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Id of the database every project gets by default
pub const DEFAULT_DATABASE: &str = "(default)";

/// Firestore store backed by the REST API
#[derive(Debug)]
pub struct FirestoreStore {
    http: HttpClient,
    project_id: String,
    database_id: String,
}

impl FirestoreStore {
    /// Create a store for `project_id` / `database_id`
    ///
    /// The HTTP client must already carry the base URL and authentication.
    pub fn new(
        http: HttpClient,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let database_id = database_id.into();

        if project_id.is_empty() {
            return Err(Error::invalid_value("project", "project id cannot be empty"));
        }
        if database_id.is_empty() {
            return Err(Error::invalid_value(
                "database",
                "database id cannot be empty",
            ));
        }

        Ok(Self {
            http,
            project_id,
            database_id,
        })
    }

    /// Project this store writes to
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Database this store writes to
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// `projects/{project}/databases/{database}/documents`
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    /// Fully qualified resource name of `collection/document_id`
    pub fn document_name(&self, collection: &str, document_id: &str) -> String {
        format!("{}/{collection}/{document_id}", self.documents_root())
    }

    /// Path of the commit endpoint, relative to the base URL
    pub fn commit_path(&self) -> String {
        format!("/v1/{}:commit", self.documents_root())
    }

    /// Serialize a batch into a `CommitRequest` body
    pub fn commit_request(&self, batch: &WriteBatch) -> JsonValue {
        let writes: Vec<JsonValue> = batch
            .writes()
            .iter()
            .map(|write| match write {
                Write::Set {
                    collection,
                    document_id,
                    body,
                } => json!({
                    "update": {
                        "name": self.document_name(collection, document_id),
                        "fields": encode_fields(body),
                    }
                }),
            })
            .collect();

        json!({ "writes": writes })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn commit(&self, batch: &WriteBatch) -> Result<CommitResponse> {
        debug!(
            project = %self.project_id,
            database = %self.database_id,
            writes = batch.len(),
            "Committing batch"
        );

        let body = self.commit_request(batch);
        self.http
            .post_json(&self.commit_path(), body)
            .await
            .map_err(describe_api_error)
    }
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Replace a raw JSON error body with `STATUS: message` when possible
fn describe_api_error(err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } => {
            let described = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| match (parsed.error.status, parsed.error.message) {
                    (Some(code), Some(message)) => Some(format!("{code}: {message}")),
                    (None, Some(message)) => Some(message),
                    (Some(code), None) => Some(code),
                    (None, None) => None,
                });
            Error::http_status(status, described.unwrap_or(body))
        }
        other => other,
    }
}
