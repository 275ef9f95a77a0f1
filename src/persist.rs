//! JSON file persistence for the document collection.
//!
//! The collection is saved by writing to a sibling temporary file and
//! renaming it over the target path, so a crash mid-write never corrupts
//! the previously durable state.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{Result, StoreError};

/// The persisted file layout: the document collection plus the time of the
/// last completed save. Unknown fields are ignored on read.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStore {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    updated_at: String,
}

/// Durable storage for the document collection at a fixed path.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Create storage backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the document collection from the backing file.
    ///
    /// An absent, unreadable, or corrupt file is a normal cold-start case
    /// and yields an empty collection, never an error.
    pub async fn load(&self) -> Vec<Document> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted store, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read persisted store");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<PersistedStore>(&bytes) {
            Ok(persisted) => persisted.documents,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "persisted store is corrupt, starting empty"
                );
                Vec::new()
            }
        }
    }

    /// Serialize the collection and atomically replace the backing file.
    ///
    /// The parent directory is created if absent. The rename is the only
    /// state-transition point; readers never observe a partial write.
    pub async fn save(&self, documents: &[Document]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let persisted = PersistedStore {
            documents: documents.to_vec(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)
            .map_err(|e| StoreError::Storage(std::io::Error::other(e)))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            path = %self.path.display(),
            document_count = documents.len(),
            "persisted store"
        );
        Ok(())
    }
}
