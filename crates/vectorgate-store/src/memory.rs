//! In-memory index for development and testing.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the Qdrant backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use vectorgate_core::config::Distance;
use vectorgate_core::error::{Result, VectorgateError};
use vectorgate_core::filter::FilterExpr;
use vectorgate_core::models::{DocId, Document, ScoredMatch, SearchParams};

use crate::ports::DocumentIndex;

/// In-memory implementation of `DocumentIndex`
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    docs: Arc<RwLock<HashMap<String, Document>>>,
    distance: Distance,
}

impl MemoryIndex {
    /// Create a new in-memory index scoring with the given metric
    pub fn new(distance: Distance) -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
            distance,
        }
    }

    /// Score a stored vector against the query.
    ///
    /// Euclidean distance is mapped to `1 / (1 + d)` so every metric sorts
    /// descending and a score threshold is a floor.
    fn score(&self, query: &[f32], vector: &[f32]) -> f32 {
        if query.len() != vector.len() {
            return 0.0;
        }
        match self.distance {
            Distance::Cosine => cosine_similarity(query, vector),
            Distance::Dot => dot_product(query, vector),
            Distance::Euclidean => 1.0 / (1.0 + euclidean_distance(query, vector)),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

#[async_trait]
impl DocumentIndex for MemoryIndex {
    async fn extend(&self, docs: &[Document]) -> Result<()> {
        let mut store = self.docs.write().unwrap();
        for doc in docs {
            store.insert(doc.id.0.clone(), doc.clone());
        }
        Ok(())
    }

    async fn replace(&self, doc: &Document) -> Result<()> {
        let mut store = self.docs.write().unwrap();
        if !store.contains_key(doc.id.as_str()) {
            return Err(VectorgateError::DocumentNotFound { id: doc.id.to_string() });
        }
        store.insert(doc.id.0.clone(), doc.clone());
        Ok(())
    }

    async fn delete(&self, ids: &[DocId]) -> Result<()> {
        let mut store = self.docs.write().unwrap();
        for id in ids {
            store.remove(id.as_str());
        }
        Ok(())
    }

    async fn embedding(&self, id: &DocId) -> Result<Vec<f32>> {
        let store = self.docs.read().unwrap();
        let doc = store
            .get(id.as_str())
            .ok_or_else(|| VectorgateError::DocumentNotFound { id: id.to_string() })?;
        doc.embedding
            .clone()
            .ok_or_else(|| VectorgateError::MissingEmbedding { id: id.to_string() })
    }

    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<ScoredMatch>> {
        let store = self.docs.read().unwrap();

        // Documents stored without an embedding score as zero vectors,
        // matching what the remote backend persists for them.
        let zeros = vec![0.0; query.len()];

        let mut results: Vec<ScoredMatch> = store
            .values()
            .filter(|doc| params.filter.as_ref().is_none_or(|f| f.matches(doc)))
            .map(|doc| {
                let vector = doc.embedding.as_deref().unwrap_or(&zeros);
                ScoredMatch {
                    score: self.score(query, vector),
                    doc: doc.clone(),
                }
            })
            .collect();

        if let Some(threshold) = params.score_threshold {
            results.retain(|r| r.score >= threshold);
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(params.limit);

        Ok(results)
    }

    async fn find(&self, filter: &FilterExpr, limit: Option<usize>) -> Result<Vec<Document>> {
        let store = self.docs.read().unwrap();
        let mut results: Vec<Document> =
            store.values().filter(|doc| filter.matches(doc)).cloned().collect();
        if let Some(limit) = limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn clear(&self) -> Result<()> {
        self.docs.write().unwrap().clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.docs.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorgate_core::filter::{Condition, RangeSpec};

    fn sample_docs() -> Vec<Document> {
        (1..=6)
            .map(|i| {
                Document::new(format!("doc{}", i))
                    .with_embedding(vec![i as f32, (7 - i) as f32])
            })
            .collect()
    }

    fn params(limit: usize) -> SearchParams {
        SearchParams {
            limit,
            score_threshold: None,
            filter: None,
        }
    }

    #[tokio::test]
    async fn test_extend_increases_count() {
        let index = MemoryIndex::new(Distance::Cosine);
        let docs = sample_docs();
        index.extend(&docs).await.unwrap();
        assert_eq!(index.count().await.unwrap(), docs.len());
    }

    #[tokio::test]
    async fn test_extend_empty_is_noop() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&[]).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_membership() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();

        let ids: Vec<DocId> = vec!["doc1".into(), "doc2".into(), "doc3".into()];
        index.delete(&ids).await.unwrap();

        assert_eq!(index.count().await.unwrap(), 3);
        for id in &ids {
            assert!(matches!(
                index.embedding(id).await,
                Err(VectorgateError::DocumentNotFound { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ignored() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();
        index.delete(&["ghost".into()]).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_replace_mutates_without_count_change() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();

        let updated = Document::new("doc1").with_text("modified").with_embedding(vec![1.0, 1.0]);
        index.replace(&updated).await.unwrap();

        assert_eq!(index.count().await.unwrap(), 6);
        assert_eq!(index.embedding(&"doc1".into()).await.unwrap(), vec![1.0, 1.0]);
    }

    #[tokio::test]
    async fn test_replace_missing_id_errors() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();

        let ghost = Document::new("ghost").with_embedding(vec![0.0, 0.0]);
        let err = index.replace(&ghost).await.unwrap_err();
        assert!(matches!(err, VectorgateError::DocumentNotFound { id } if id == "ghost"));
        assert_eq!(index.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_embedding_roundtrip_and_missing() {
        let index = MemoryIndex::new(Distance::Euclidean);
        index
            .extend(&[Document::new("a").with_embedding(vec![1.0])])
            .await
            .unwrap();

        assert_eq!(index.embedding(&"a".into()).await.unwrap(), vec![1.0]);
        assert!(matches!(
            index.embedding(&"b".into()).await,
            Err(VectorgateError::DocumentNotFound { id }) if id == "b"
        ));
    }

    #[tokio::test]
    async fn test_search_returns_best_first() {
        let index = MemoryIndex::new(Distance::Cosine);
        index
            .extend(&[
                Document::new("a").with_embedding(vec![1.0, 3.0]),
                Document::new("b").with_embedding(vec![1.0, 1.0]),
                Document::new("c").with_embedding(vec![3.0, 1.0]),
                Document::new("d").with_embedding(vec![2.0, 3.0]),
            ])
            .await
            .unwrap();

        let matches = index.search(&[1.0, 1.0], &params(10)).await.unwrap();

        assert_eq!(matches[0].doc.id.as_str(), "b");
        let scores: Vec<f32> = matches.iter().map(|m| m.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn test_search_euclidean_orders_by_proximity() {
        let index = MemoryIndex::new(Distance::Euclidean);
        index
            .extend(&[
                Document::new("near").with_embedding(vec![1.0, 1.0]),
                Document::new("far").with_embedding(vec![10.0, 10.0]),
            ])
            .await
            .unwrap();

        let matches = index.search(&[1.0, 1.0], &params(10)).await.unwrap();
        assert_eq!(matches[0].doc.id.as_str(), "near");
        assert!(matches[0].score > matches[1].score);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();

        for limit in [1, 2, 3] {
            let matches = index.search(&[1.0, 1.0], &params(limit)).await.unwrap();
            assert_eq!(matches.len(), limit);
        }
    }

    #[tokio::test]
    async fn test_search_respects_threshold() {
        let index = MemoryIndex::new(Distance::Cosine);
        index
            .extend(&[
                Document::new("aligned").with_embedding(vec![1.0, 1.0]),
                Document::new("orthogonal").with_embedding(vec![-1.0, 1.0]),
            ])
            .await
            .unwrap();

        let p = SearchParams {
            limit: 10,
            score_threshold: Some(0.5),
            filter: None,
        };
        let matches = index.search(&[1.0, 1.0], &p).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].doc.id.as_str(), "aligned");
    }

    #[tokio::test]
    async fn test_search_with_filter_restriction() {
        let index = MemoryIndex::new(Distance::Cosine);
        let docs: Vec<Document> = (0..10)
            .map(|i| {
                Document::new(format!("r{}", i))
                    .with_embedding(vec![1.0, i as f32])
                    .with_tag("price", i)
            })
            .collect();
        index.extend(&docs).await.unwrap();

        let p = SearchParams {
            limit: 10,
            score_threshold: None,
            filter: Some(FilterExpr {
                must: vec![Condition::range(
                    "price",
                    RangeSpec { gte: Some(5.0), ..Default::default() },
                )],
                must_not: vec![],
            }),
        };
        let matches = index.search(&[1.0, 1.0], &p).await.unwrap();

        assert_eq!(matches.len(), 5);
        assert!(matches
            .iter()
            .all(|m| m.doc.tags["price"].as_f64().unwrap() >= 5.0));
    }

    #[tokio::test]
    async fn test_docs_without_embeddings_are_indexed_and_filterable() {
        let index = MemoryIndex::new(Distance::Cosine);
        index
            .extend(&[
                Document::new("t1").with_text("hello"),
                Document::new("t2").with_text("world"),
                Document::new("t3").with_tag("x", 0.8),
            ])
            .await
            .unwrap();

        assert_eq!(index.count().await.unwrap(), 3);

        let found = index
            .find(
                &FilterExpr {
                    must: vec![Condition::matches("text", "hello")],
                    must_not: vec![],
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "t1");
    }

    #[tokio::test]
    async fn test_find_range_predicate() {
        let index = MemoryIndex::new(Distance::Cosine);
        let docs: Vec<Document> = (0..50)
            .map(|i| {
                Document::new(format!("r{}", i))
                    .with_embedding(vec![i as f32])
                    .with_tag("price", i)
            })
            .collect();
        index.extend(&docs).await.unwrap();

        for threshold in [10.0, 20.0, 30.0] {
            let filter = FilterExpr {
                must: vec![Condition::range(
                    "price",
                    RangeSpec { gte: Some(threshold), ..Default::default() },
                )],
                must_not: vec![],
            };
            let found = index.find(&filter, None).await.unwrap();
            assert_eq!(found.len(), 50 - threshold as usize);
            assert!(found
                .iter()
                .all(|d| d.tags["price"].as_f64().unwrap() >= threshold));
        }
    }

    #[tokio::test]
    async fn test_find_respects_limit() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();

        let found = index.find(&FilterExpr::default(), Some(2)).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_empties_the_index() {
        let index = MemoryIndex::new(Distance::Cosine);
        index.extend(&sample_docs()).await.unwrap();
        assert_eq!(index.count().await.unwrap(), 6);

        index.clear().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
