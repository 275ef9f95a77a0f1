//! Configuration for the knowledge store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Default Ollama endpoint.
const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default embedding model.
const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Default persistence file, relative to the working directory.
const DEFAULT_STORAGE_FILE: &str = "rag_store.json";

/// Maximum characters per chunk by default.
const DEFAULT_MAX_CHUNK_CHARS: usize = 600;

/// Configuration parameters for a [`RagStore`](crate::store::RagStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Base URL of the embedding provider (no trailing slash).
    pub host: String,
    /// Model identifier sent with every embedding request.
    pub embed_model: String,
    /// Path of the JSON persistence file.
    pub storage_path: PathBuf,
    /// Maximum chunk size in characters.
    pub max_chunk_chars: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }
}

impl StoreConfig {
    /// Create a new builder for constructing a [`StoreConfig`].
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Build a configuration from the `OLLAMA_HOST`, `EMBED_MODEL`, and
    /// `RAG_STORE_PATH` environment variables, falling back to defaults
    /// for any that are unset.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            builder = builder.host(host);
        }
        if let Ok(model) = std::env::var("EMBED_MODEL") {
            builder = builder.embed_model(model);
        }
        if let Ok(path) = std::env::var("RAG_STORE_PATH") {
            builder = builder.storage_path(path);
        }
        builder.build()
    }
}

/// Builder for constructing a validated [`StoreConfig`].
#[derive(Debug, Clone, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the embedding provider base URL. A trailing slash is stripped.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.config.host = host.trim_end_matches('/').to_string();
        self
    }

    /// Set the embedding model identifier.
    pub fn embed_model(mut self, model: impl Into<String>) -> Self {
        self.config.embed_model = model.into();
        self
    }

    /// Set the path of the JSON persistence file.
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_path = path.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn max_chunk_chars(mut self, max_chars: usize) -> Self {
        self.config.max_chunk_chars = max_chars;
        self
    }

    /// Build the [`StoreConfig`], validating that parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if:
    /// - `host` or `embed_model` is empty
    /// - `max_chunk_chars` is zero
    pub fn build(self) -> Result<StoreConfig> {
        if self.config.host.is_empty() {
            return Err(StoreError::Config("host must not be empty".to_string()));
        }
        if self.config.embed_model.is_empty() {
            return Err(StoreError::Config("embed_model must not be empty".to_string()));
        }
        if self.config.max_chunk_chars == 0 {
            return Err(StoreError::Config(
                "max_chunk_chars must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
