//! In-memory vector index using cosine similarity.
//!
//! The index is pure derived state: it is rebuilt from the document
//! collection after every mutation and never persisted.

use tracing::warn;

use crate::document::{Document, SearchResult};

/// Search results are clamped to at most this many entries.
const MAX_TOP_K: i64 = 10;

/// A reference from an index row back to its chunk, with a denormalized
/// text copy for fast result construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRef {
    /// Identifier of the parent document.
    pub doc_id: String,
    /// 0-based position of the chunk within its document.
    pub chunk_index: usize,
    /// The chunk text.
    pub text: String,
}

/// A dense matrix of L2-normalized chunk embeddings with parallel metadata.
///
/// Search is a brute-force linear scan over all rows. That is deliberate:
/// the store targets small corpora (hundreds to low thousands of chunks),
/// where a scan beats the complexity of approximate-nearest-neighbor
/// structures.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    refs: Vec<ChunkRef>,
    matrix: Vec<Vec<f32>>,
}

/// L2-normalize a vector in place. Returns `false` for vectors that cannot
/// be normalized (zero or non-finite norm).
fn normalize(vector: &mut [f32]) -> bool {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
    true
}

impl VectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors currently in the index.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.refs.len(), self.matrix.len());
        self.refs.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Reconstruct the index from the document collection, in
    /// document-then-chunk order.
    ///
    /// Chunks whose embedding is empty or has a zero or non-finite norm
    /// cannot be ranked; they are left out of the index (but remain in the
    /// stored document) and logged.
    pub fn rebuild(&mut self, documents: &[Document]) {
        let mut refs = Vec::new();
        let mut matrix = Vec::new();

        for document in documents {
            for chunk in &document.chunks {
                if chunk.embedding.is_empty() {
                    continue;
                }
                let mut vector = chunk.embedding.clone();
                if !normalize(&mut vector) {
                    warn!(
                        document.id = %document.id,
                        chunk_index = chunk.index,
                        "skipping chunk with unusable embedding"
                    );
                    continue;
                }
                refs.push(ChunkRef {
                    doc_id: document.id.clone(),
                    chunk_index: chunk.index,
                    text: chunk.text.clone(),
                });
                matrix.push(vector);
            }
        }

        self.refs = refs;
        self.matrix = matrix;
    }

    /// Rank all indexed chunks against a query embedding.
    ///
    /// `top_k` is clamped into `[1, 10]` regardless of the caller-supplied
    /// value. Returns an empty `Vec` when the index is empty or the query
    /// vector has zero norm; scores are cosine similarities in `[-1, 1]`,
    /// ties broken in favor of the earlier index entry.
    pub fn search(&self, query: &[f32], top_k: i64) -> Vec<SearchResult> {
        let top_k = top_k.clamp(1, MAX_TOP_K) as usize;
        if self.refs.is_empty() {
            return Vec::new();
        }

        let mut query = query.to_vec();
        if !normalize(&mut query) {
            return Vec::new();
        }

        let scores: Vec<f32> = self
            .matrix
            .iter()
            .map(|row| row.iter().zip(&query).map(|(a, b)| a * b).sum())
            .collect();

        // Stable sort keeps original index order for equal scores.
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(top_k);

        order
            .into_iter()
            .map(|i| {
                let chunk = &self.refs[i];
                SearchResult {
                    doc_id: chunk.doc_id.clone(),
                    chunk_index: chunk.chunk_index,
                    text: chunk.text.clone(),
                    score: scores[i],
                }
            })
            .collect()
    }
}
