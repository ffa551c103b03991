//! Tests for the bulk loader

use super::*;
use crate::dataset::load_dataset_from_str;
use crate::error::Error;
use crate::store::{MemoryStore, WriteBatch};
use crate::types::{Document, DocumentBody, JsonValue};
use pretty_assertions::assert_eq;
use serde_json::json;

fn body(value: JsonValue) -> DocumentBody {
    value.as_object().cloned().unwrap()
}

fn docs(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| Document::new(format!("d{i}"), body(json!({ "n": i }))))
        .collect()
}

fn collection_of(batch: &WriteBatch) -> &str {
    batch.writes().first().map_or("", |w| w.collection())
}

// ============================================================================
// upload
// ============================================================================

#[tokio::test]
async fn test_upload_single_batch() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    let report = loader.upload("items", &docs(3)).await.unwrap();

    assert_eq!(
        report,
        CollectionReport {
            name: "items".to_string(),
            documents: 3,
            batches: 1,
        }
    );
    assert_eq!(store.count("items"), 3);
    assert_eq!(store.commits().len(), 1);
    assert_eq!(store.commits()[0].len(), 3);
}

#[tokio::test]
async fn test_upload_ignores_batch_limit_by_default() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    loader.upload("big", &docs(1200)).await.unwrap();

    let commits = store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].len(), 1200);
}

#[tokio::test]
async fn test_upload_chunked() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store).with_batch_size(500).unwrap();

    let report = loader.upload("big", &docs(1200)).await.unwrap();

    assert_eq!(report.batches, 3);
    let sizes: Vec<usize> = store.commits().iter().map(WriteBatch::len).collect();
    assert_eq!(sizes, vec![500, 500, 200]);
    assert_eq!(store.count("big"), 1200);
}

#[tokio::test]
async fn test_upload_empty_collection_commits_once() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    let report = loader.upload("empty", &[]).await.unwrap();

    assert_eq!(report.documents, 0);
    assert_eq!(report.batches, 1);
    assert_eq!(store.commits().len(), 1);
    assert!(store.commits()[0].is_empty());
}

#[tokio::test]
async fn test_upload_failure_names_collection() {
    let store = MemoryStore::new().fail_on("users");
    let loader = BulkLoader::new(&store);

    let err = loader.upload("users", &docs(2)).await.unwrap_err();

    match err {
        Error::Commit { collection, message } => {
            assert_eq!(collection, "users");
            assert!(message.contains("HTTP 503"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.count("users"), 0);
}

#[test]
fn test_batch_size_bounds() {
    let store = MemoryStore::new();
    assert!(BulkLoader::new(&store).with_batch_size(0).is_err());
    assert!(BulkLoader::new(&store).with_batch_size(501).is_err());
    assert_eq!(
        BulkLoader::new(&store)
            .with_batch_size(1)
            .unwrap()
            .batch_size(),
        Some(1)
    );
    assert_eq!(BulkLoader::new(&store).batch_size(), None);
}

#[test]
fn test_plan_keeps_document_order() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store).with_batch_size(2).unwrap();

    let batches = loader.plan("items", &docs(5));
    let paths: Vec<Vec<String>> = batches
        .iter()
        .map(|b| b.writes().iter().map(|w| w.document_path()).collect())
        .collect();

    assert_eq!(
        paths,
        vec![
            vec!["items/d0", "items/d1"],
            vec!["items/d2", "items/d3"],
            vec!["items/d4"],
        ]
    );
}

// ============================================================================
// upload_all
// ============================================================================

#[tokio::test]
async fn test_upload_all_example() {
    let dataset = load_dataset_from_str(
        r#"{"users": {"u1": {"name": "Ann"}}, "posts": {"p1": {"title": "Hi"}}}"#,
    )
    .unwrap();
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    let mut seen = Vec::new();
    let summary = loader
        .upload_all(&dataset, |report| {
            seen.push(report.name.clone());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(seen, vec!["users", "posts"]);
    assert_eq!(summary.collections.len(), 2);
    assert_eq!(summary.documents(), 2);
    assert_eq!(summary.batches(), 2);

    assert_eq!(
        store.get("users", "u1").map(JsonValue::Object),
        Some(json!({"name": "Ann"}))
    );
    assert_eq!(
        store.get("posts", "p1").map(JsonValue::Object),
        Some(json!({"title": "Hi"}))
    );
}

#[tokio::test]
async fn test_upload_all_follows_file_order() {
    let dataset = load_dataset_from_str(
        r#"{"zeta": {"z": {}}, "alpha": {"a": {}}, "mid": {"m": {}}}"#,
    )
    .unwrap();
    let store = MemoryStore::new();

    BulkLoader::new(&store)
        .upload_all(&dataset, |_| Ok(()))
        .await
        .unwrap();

    let order: Vec<String> = store
        .commits()
        .iter()
        .map(|b| collection_of(b).to_string())
        .collect();
    assert_eq!(order, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_upload_all_stops_at_first_failure() {
    let dataset = load_dataset_from_str(
        r#"{"users": {"u1": {}}, "posts": {"p1": {}}, "comments": {"c1": {}}}"#,
    )
    .unwrap();
    let store = MemoryStore::new().fail_on("posts");

    let mut seen = Vec::new();
    let err = BulkLoader::new(&store)
        .upload_all(&dataset, |report| {
            seen.push(report.name.clone());
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Commit { ref collection, .. } if collection == "posts"));
    assert_eq!(seen, vec!["users"]);
    assert_eq!(store.count("users"), 1);
    assert_eq!(store.count("comments"), 0);
    assert_eq!(store.commits().len(), 1);
}

#[tokio::test]
async fn test_upload_all_stops_when_callback_fails() {
    let dataset = load_dataset_from_str(
        r#"{"users": {"u1": {}}, "posts": {"p1": {}}, "comments": {"c1": {}}}"#,
    )
    .unwrap();
    let store = MemoryStore::new();

    let err = BulkLoader::new(&store)
        .upload_all(&dataset, |report| {
            Err(Error::Other(format!("cannot report {}", report.name)))
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "cannot report users");
    assert_eq!(store.commits().len(), 1);
    assert_eq!(store.count("posts"), 0);
    assert_eq!(store.count("comments"), 0);
}

#[tokio::test]
async fn test_upload_all_is_idempotent() {
    let dataset = load_dataset_from_str(
        r#"{"users": {"u1": {"name": "Ann", "tags": ["x"]}, "u2": {"name": "Bo"}}}"#,
    )
    .unwrap();
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    loader.upload_all(&dataset, |_| Ok(())).await.unwrap();
    let first = store.snapshot();
    loader.upload_all(&dataset, |_| Ok(())).await.unwrap();

    assert_eq!(store.snapshot(), first);
    assert_eq!(store.count("users"), 2);
}

#[tokio::test]
async fn test_upload_all_overwrites_existing_bodies() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);

    let before = load_dataset_from_str(r#"{"users": {"u1": {"name": "Ann", "age": 30}}}"#).unwrap();
    let after = load_dataset_from_str(r#"{"users": {"u1": {"name": "Ann"}}}"#).unwrap();

    loader.upload_all(&before, |_| Ok(())).await.unwrap();
    loader.upload_all(&after, |_| Ok(())).await.unwrap();

    assert_eq!(
        store.get("users", "u1").map(JsonValue::Object),
        Some(json!({"name": "Ann"}))
    );
}

#[tokio::test]
async fn test_upload_all_empty_dataset() {
    let store = MemoryStore::new();
    let summary = BulkLoader::new(&store)
        .upload_all(&load_dataset_from_str("{}").unwrap(), |_| Ok(()))
        .await
        .unwrap();

    assert!(summary.collections.is_empty());
    assert!(store.commits().is_empty());
}
