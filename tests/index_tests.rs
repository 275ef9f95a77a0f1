//! Tests for the cosine-similarity vector index.

use proptest::prelude::*;
use rag_store::document::{Chunk, Document};
use rag_store::index::VectorIndex;

/// Build a document whose chunks carry the given embeddings.
fn doc(id: &str, embeddings: &[Vec<f32>]) -> Document {
    Document {
        id: id.to_string(),
        text: format!("text of {id}"),
        chunks: embeddings
            .iter()
            .enumerate()
            .map(|(index, embedding)| Chunk {
                index,
                text: format!("{id} chunk {index}"),
                embedding: embedding.clone(),
            })
            .collect(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        metadata: Default::default(),
    }
}

#[test]
fn rebuild_indexes_all_usable_chunks() {
    let docs = vec![
        doc("a", &[vec![1.0, 0.0], vec![0.0, 1.0]]),
        doc("b", &[vec![0.5, 0.5]]),
    ];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);
    assert_eq!(index.len(), 3);
}

#[test]
fn rebuild_skips_missing_and_zero_norm_embeddings() {
    let docs = vec![doc(
        "a",
        &[vec![1.0, 0.0], vec![], vec![0.0, 0.0], vec![f32::NAN, 1.0]],
    )];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);
    // Only the first chunk can be normalized and ranked.
    assert_eq!(index.len(), 1);
    let results = index.search(&[1.0, 0.0], 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk_index, 0);
}

#[test]
fn search_ranks_by_cosine_similarity() {
    let docs = vec![
        doc("exact", &[vec![1.0, 0.0]]),
        doc("orthogonal", &[vec![0.0, 1.0]]),
        doc("near", &[vec![0.9, 0.1]]),
    ];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);

    let results = index.search(&[1.0, 0.0], 3);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].doc_id, "exact");
    assert_eq!(results[1].doc_id, "near");
    assert_eq!(results[2].doc_id, "orthogonal");
    for result in &results {
        assert!((-1.0..=1.0).contains(&result.score), "score out of range: {}", result.score);
    }
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!(results[2].score.abs() < 1e-6);
}

#[test]
fn ties_are_broken_by_index_order() {
    // Same direction, different magnitude: identical after normalization.
    let docs = vec![
        doc("first", &[vec![2.0, 0.0]]),
        doc("second", &[vec![1.0, 0.0]]),
    ];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);

    let results = index.search(&[1.0, 0.0], 2);
    assert_eq!(results[0].doc_id, "first");
    assert_eq!(results[1].doc_id, "second");
}

#[test]
fn top_k_is_clamped_into_range() {
    let embeddings: Vec<Vec<f32>> = (0..15).map(|i| vec![1.0, i as f32 * 0.01]).collect();
    let docs = vec![doc("a", &embeddings)];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);

    assert_eq!(index.search(&[1.0, 0.0], 0).len(), 1);
    assert_eq!(index.search(&[1.0, 0.0], -5).len(), 1);
    assert_eq!(index.search(&[1.0, 0.0], 1000).len(), 10);
}

#[test]
fn empty_index_returns_no_results() {
    let index = VectorIndex::new();
    assert!(index.search(&[1.0, 0.0], 3).is_empty());
}

#[test]
fn zero_norm_query_fails_closed() {
    let docs = vec![doc("a", &[vec![1.0, 0.0]])];
    let mut index = VectorIndex::new();
    index.rebuild(&docs);
    assert!(index.search(&[0.0, 0.0], 3).is_empty());
}

/// Generate a non-zero embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter("non-zero embedding", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-6
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Results are ordered by descending score and bounded by the clamped
    /// top_k and the number of indexed chunks.
    #[test]
    fn results_ordered_descending_and_bounded(
        embeddings in proptest::collection::vec(arb_embedding(8), 1..30),
        query in arb_embedding(8),
        top_k in -20i64..40,
    ) {
        let docs = vec![doc("d", &embeddings)];
        let mut index = VectorIndex::new();
        index.rebuild(&docs);
        prop_assert_eq!(index.len(), embeddings.len());

        let results = index.search(&query, top_k);
        let clamped = top_k.clamp(1, 10) as usize;
        prop_assert!(results.len() <= clamped);
        prop_assert!(results.len() <= embeddings.len());

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
