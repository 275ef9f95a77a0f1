//! Tests for JSON persistence of the document collection.

use std::collections::HashMap;

use rag_store::document::{Chunk, Document};
use rag_store::persist::Storage;
use serde_json::json;

fn sample_documents() -> Vec<Document> {
    let mut metadata = HashMap::new();
    metadata.insert("type".to_string(), json!("note"));
    metadata.insert("truncated".to_string(), json!(false));
    vec![Document {
        id: "doc-1".to_string(),
        text: "Hello world.\n\nSecond paragraph.".to_string(),
        chunks: vec![
            Chunk { index: 0, text: "Hello world.".to_string(), embedding: vec![0.1, 0.2] },
            Chunk { index: 1, text: "Second paragraph.".to_string(), embedding: vec![0.3, 0.4] },
        ],
        created_at: "2024-05-01T10:00:00Z".to_string(),
        metadata,
    }]
}

#[tokio::test]
async fn save_then_load_round_trips_documents() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("kb.json"));

    let documents = sample_documents();
    storage.save(&documents).await.unwrap();
    let loaded = storage.load().await;
    assert_eq!(loaded, documents);

    // Saving what was loaded is idempotent for the document collection.
    storage.save(&loaded).await.unwrap();
    assert_eq!(storage.load().await, documents);
}

#[tokio::test]
async fn persisted_file_has_the_expected_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    let storage = Storage::new(&path);
    storage.save(&sample_documents()).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["updated_at"].is_string());
    assert_eq!(value["documents"][0]["id"], "doc-1");
    assert_eq!(value["documents"][0]["chunks"][1]["index"], 1);

    // No stray temporary file after the atomic rename.
    assert!(!dir.path().join("kb.tmp").exists());
}

#[tokio::test]
async fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path().join("absent.json"));
    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(&path, "{ this is not json").unwrap();
    let storage = Storage::new(&path);
    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("kb.json");
    let storage = Storage::new(&path);
    storage.save(&sample_documents()).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn legacy_meta_field_and_unknown_fields_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(
        &path,
        json!({
            "documents": [{
                "id": "old-doc",
                "text": "old text",
                "chunks": [{ "index": 0, "text": "old text", "embedding": [1.0] }],
                "created_at": "2023-01-01T00:00:00",
                "meta": { "origin": "import" },
                "schema_hint": "from-a-future-version"
            }],
            "updated_at": "2023-01-01T00:00:00",
            "format": 2
        })
        .to_string(),
    )
    .unwrap();

    let loaded = Storage::new(&path).load().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "old-doc");
    assert_eq!(loaded[0].metadata["origin"], json!("import"));
}

#[tokio::test]
async fn save_replaces_previous_contents_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    let storage = Storage::new(&path);

    storage.save(&sample_documents()).await.unwrap();
    storage.save(&[]).await.unwrap();

    let loaded = storage.load().await;
    assert!(loaded.is_empty());
}
