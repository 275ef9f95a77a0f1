//! In-process RAG knowledge store backed by Ollama embeddings.
//!
//! This crate ingests text documents, splits them into bounded-length
//! chunks, embeds each chunk through an external embedding provider, keeps
//! everything in a JSON file with atomic replacement, and answers
//! cosine-similarity searches over the stored chunks.
//!
//! # Architecture
//!
//! - [`ParagraphChunker`] — deterministic paragraph/word-boundary splitting
//! - [`OllamaEmbeddingProvider`] — HTTP client for `/api/embeddings`
//! - [`VectorIndex`] — derived, in-memory cosine-similarity index
//! - [`Storage`] — durable JSON persistence with atomic rename
//! - [`RagStore`] — the orchestrator tying the pieces together
//!
//! The HTTP boundary layer is not part of this crate; it consumes
//! [`RagStore`]'s API (`add_document`, `delete_document`, `clear`,
//! `list_documents`, `stats`, `search`) behind an `Arc`.
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
//! store.add_document("Paris is the capital of France.", Default::default()).await?;
//! let hits = store.search("capital of France", 3).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod ollama;
pub mod persist;
pub mod store;

pub use chunking::{Chunker, ParagraphChunker};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use document::{Chunk, Document, DocumentSummary, SearchResult, StoreStats};
pub use embedding::EmbeddingProvider;
pub use error::{Result, StoreError};
pub use index::{ChunkRef, VectorIndex};
pub use ollama::OllamaEmbeddingProvider;
pub use persist::Storage;
pub use store::{RagStore, RagStoreBuilder};
