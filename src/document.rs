//! Data types for documents, chunks, summaries, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum characters of document text shown in a preview.
const PREVIEW_CHARS: usize = 160;

/// A stored document: full text plus its embedded chunks.
///
/// Documents are immutable once stored; the only supported mutation is
/// wholesale deletion. Unknown fields in persisted documents are ignored
/// on read for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The full cleaned source text.
    #[serde(default)]
    pub text: String,
    /// The embedded chunks, in chunking order.
    #[serde(default)]
    pub chunks: Vec<Chunk>,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,
    /// Open key-value metadata (source type, origin, truncation flag, ...).
    ///
    /// Older persisted files used the field name `meta`.
    #[serde(default, alias = "meta")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Build the caller-facing summary for this document.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            preview: preview(&self.text),
            chunks: self.chunks.len(),
            created_at: self.created_at.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// 0-based position within the parent document.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The embedding vector for this chunk's text.
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// A caller-facing view of a stored document, without text or embeddings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// Unique identifier for the document.
    pub id: String,
    /// First characters of the document text, `…`-terminated if truncated.
    pub preview: String,
    /// Number of chunks stored for the document.
    pub chunks: usize,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Metadata as supplied at ingestion time.
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A retrieved chunk paired with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the parent document.
    pub doc_id: String,
    /// 0-based position of the chunk within its document.
    pub chunk_index: usize,
    /// The chunk text.
    pub text: String,
    /// Cosine similarity against the query, in `[-1, 1]`.
    pub score: f32,
}

/// Aggregate counts over the current document collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored documents.
    pub document_count: usize,
    /// Number of chunks across all stored documents.
    pub chunk_count: usize,
}

/// Collapse newlines and truncate to the preview length, char-safe.
fn preview(text: &str) -> String {
    let flattened = text.trim().replace("\r\n", " ").replace('\n', " ");
    let mut out: String = flattened.chars().take(PREVIEW_CHARS).collect();
    if flattened.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
