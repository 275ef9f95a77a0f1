//! The knowledge store orchestrator.
//!
//! [`RagStore`] owns the document collection and its derived
//! [`VectorIndex`], serializes all mutations under a single lock, and
//! coordinates chunking, embedding, index rebuild, and persistence.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rag_store::{OllamaEmbeddingProvider, RagStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let provider = OllamaEmbeddingProvider::new(&config.host, &config.embed_model)?;
//! let store = RagStore::builder()
//!     .config(config)
//!     .embedding_provider(Arc::new(provider))
//!     .open()
//!     .await?;
//!
//! let summary = store.add_document("text to remember", Default::default()).await?;
//! let hits = store.search("what do you remember?", 3).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chunking::{Chunker, ParagraphChunker};
use crate::config::StoreConfig;
use crate::document::{Chunk, Document, DocumentSummary, SearchResult, StoreStats};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, StoreError};
use crate::index::VectorIndex;
use crate::persist::Storage;

/// The mutable state behind the store's lock: the document collection
/// (source of truth) and the index derived from it.
#[derive(Debug, Default)]
struct StoreState {
    documents: Vec<Document>,
    index: VectorIndex,
}

/// An in-process RAG knowledge store.
///
/// Ingests documents (chunk → embed → persist), answers cosine-similarity
/// searches, and keeps the on-disk JSON file in sync with every completed
/// mutation. Constructed once at process start via [`RagStore::builder`];
/// the boundary layer holds it behind an `Arc`.
pub struct RagStore {
    state: RwLock<StoreState>,
    provider: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
    storage: Storage,
}

impl RagStore {
    /// Create a new [`RagStoreBuilder`].
    pub fn builder() -> RagStoreBuilder {
        RagStoreBuilder::default()
    }

    /// Add a document to the knowledge base.
    ///
    /// Chunks the text, embeds each chunk sequentially, then appends the
    /// document, rebuilds the index, and persists — all under the write
    /// lock. Any embedding failure aborts the whole operation; no partial
    /// document is ever stored or written to disk.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the trimmed text is empty or
    ///   chunking yields no chunks.
    /// - [`StoreError::Provider`] if any chunk embedding fails.
    /// - [`StoreError::Storage`] if the collection cannot be persisted.
    pub async fn add_document(
        &self,
        text: &str,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<DocumentSummary> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Err(StoreError::Validation("document text must not be empty".to_string()));
        }

        let chunk_texts = self.chunker.chunk(cleaned);
        if chunk_texts.is_empty() {
            return Err(StoreError::Validation(
                "document text could not be split into chunks".to_string(),
            ));
        }

        // Embed before taking the lock: a slow provider must not block
        // reads against the previous consistent state.
        let mut chunks = Vec::with_capacity(chunk_texts.len());
        for (index, chunk_text) in chunk_texts.into_iter().enumerate() {
            let embedding = self.provider.embed(&chunk_text).await?;
            chunks.push(Chunk { index, text: chunk_text, embedding });
        }

        let document = Document {
            id: Uuid::new_v4().to_string(),
            text: cleaned.to_string(),
            chunks,
            created_at: Utc::now().to_rfc3339(),
            metadata,
        };
        let summary = document.summary();

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.documents.push(document);
        state.index.rebuild(&state.documents);
        if let Err(e) = self.storage.save(&state.documents).await {
            // Roll back so memory never diverges from durable state.
            state.documents.pop();
            state.index.rebuild(&state.documents);
            return Err(e);
        }

        info!(
            document.id = %summary.id,
            chunk_count = summary.chunks,
            "added document"
        );
        Ok(summary)
    }

    /// Delete the document with the given id.
    ///
    /// Returns `false` when no document matched; the index and the
    /// persisted file are only touched when something was removed.
    pub async fn delete_document(&self, doc_id: &str) -> Result<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let before = state.documents.len();
        state.documents.retain(|doc| doc.id != doc_id);
        if state.documents.len() == before {
            return Ok(false);
        }

        state.index.rebuild(&state.documents);
        self.storage.save(&state.documents).await?;
        info!(document.id = %doc_id, "deleted document");
        Ok(true)
    }

    /// Remove all documents, rebuild the (now empty) index, and persist.
    pub async fn clear(&self) -> Result<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.documents.clear();
        state.index.rebuild(&state.documents);
        self.storage.save(&state.documents).await?;
        info!("cleared knowledge base");
        Ok(())
    }

    /// Summaries for all stored documents, without text or embeddings.
    pub async fn list_documents(&self) -> Vec<DocumentSummary> {
        let state = self.state.read().await;
        state.documents.iter().map(Document::summary).collect()
    }

    /// Aggregate counts over the current collection.
    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            document_count: state.documents.len(),
            chunk_count: state.documents.iter().map(|doc| doc.chunks.len()).sum(),
        }
    }

    /// Rank stored chunks against a query string.
    ///
    /// A blank query or an empty index returns an empty list without
    /// calling the embedding provider. Otherwise the index is snapshotted
    /// under the read lock and the ranking runs on the private copy, so a
    /// concurrent mutation can never be observed half-applied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Provider`] if embedding the query fails.
    pub async fn search(&self, query: &str, top_k: i64) -> Result<Vec<SearchResult>> {
        let question = query.trim();
        if question.is_empty() {
            return Ok(Vec::new());
        }

        let index = {
            let state = self.state.read().await;
            if state.index.is_empty() {
                return Ok(Vec::new());
            }
            state.index.clone()
        };

        let query_embedding = self.provider.embed(question).await?;
        Ok(index.search(&query_embedding, top_k))
    }
}

/// Builder for constructing and opening a [`RagStore`].
///
/// The embedding provider is required; the chunker defaults to a
/// [`ParagraphChunker`] sized from the configuration.
#[derive(Default)]
pub struct RagStoreBuilder {
    config: Option<StoreConfig>,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagStoreBuilder {
    /// Set the store configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the default chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Validate the builder, load the persisted collection, and rebuild
    /// the index.
    ///
    /// Loading is fail-open: an absent or corrupt persistence file yields
    /// an empty store rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the embedding provider is missing.
    pub async fn open(self) -> Result<RagStore> {
        let config = self.config.unwrap_or_default();
        let provider = self
            .provider
            .ok_or_else(|| StoreError::Config("embedding_provider is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(ParagraphChunker::new(config.max_chunk_chars)));

        let storage = Storage::new(&config.storage_path);
        let documents = storage.load().await;
        let mut index = VectorIndex::new();
        index.rebuild(&documents);

        if !documents.is_empty() {
            info!(
                document_count = documents.len(),
                indexed_chunks = index.len(),
                "loaded knowledge base"
            );
        }
        let total_chunks: usize = documents.iter().map(|d| d.chunks.len()).sum();
        if index.len() < total_chunks {
            warn!("some persisted chunks have unusable embeddings and were not indexed");
        }

        Ok(RagStore {
            state: RwLock::new(StoreState { documents, index }),
            provider,
            chunker,
            storage,
        })
    }
}
