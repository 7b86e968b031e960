//! Per-mode query construction and execution.

use crate::backend::{SearchBackend, SearchRequest, VectorQuery, SELECT_FIELDS};
use crate::normalize::normalize;
use crate::types::{RetrievedChunk, SearchMode};
use qna_core::AppResult;
use qna_llm::EmbeddingClient;
use std::sync::Arc;

/// Shapes one search call per query and normalizes its results.
///
/// The retriever owns no ranking: fusion, tie-breaking, and relevance all
/// belong to the backend. Its responsibilities are choosing which payload
/// fields to populate for the given [`SearchMode`], invoking the embedding
/// client when a vector clause is needed (exactly once per vector or
/// hybrid query, never for text), and mapping the raw records into
/// [`RetrievedChunk`]s.
pub struct DocumentRetriever {
    backend: Arc<dyn SearchBackend>,
    embedder: Arc<dyn EmbeddingClient>,
}

impl DocumentRetriever {
    pub fn new(backend: Arc<dyn SearchBackend>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self { backend, embedder }
    }

    /// Build the parameter set for a single search call.
    ///
    /// `top_k` is forwarded as given; callers pass a positive count.
    pub async fn build_request(
        &self,
        query: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> AppResult<SearchRequest> {
        let request = match mode {
            SearchMode::Text => SearchRequest {
                search: Some(query.to_string()),
                vector_queries: Vec::new(),
                top: top_k,
                select: SELECT_FIELDS.to_string(),
            },
            SearchMode::Vector => {
                let vector = self.embedder.embed(query).await?;
                SearchRequest {
                    search: None,
                    vector_queries: vec![VectorQuery::nearest(vector, top_k)],
                    top: top_k,
                    select: SELECT_FIELDS.to_string(),
                }
            }
            SearchMode::Hybrid => {
                let vector = self.embedder.embed(query).await?;
                SearchRequest {
                    search: Some(query.to_string()),
                    vector_queries: vec![VectorQuery::nearest(vector, top_k)],
                    top: top_k,
                    select: SELECT_FIELDS.to_string(),
                }
            }
        };

        Ok(request)
    }

    /// Execute one query and return at most `top_k` normalized chunks in
    /// backend order.
    pub async fn search_documents(
        &self,
        query: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> AppResult<Vec<RetrievedChunk>> {
        tracing::info!(mode = mode.as_str(), top_k, "Retrieving documents");

        let request = self.build_request(query, top_k, mode).await?;
        let records = self.backend.search(&request).await?;

        let mut chunks = normalize(&records);
        // Cap against over-returning backends so the list length stays <= top_k.
        chunks.truncate(top_k);

        tracing::debug!(count = chunks.len(), "Retrieval complete");

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSearchBackend;
    use qna_llm::MockEmbeddingClient;
    use serde_json::json;

    fn canned_records(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                json!({
                    "title": format!("doc-{}.pdf", i),
                    "chunk": format!("chunk text {}", i),
                    "chunk_id": format!("c-{}", i),
                    "parent_id": "p-0",
                    "@search.score": 10.0 - i as f64,
                })
            })
            .collect()
    }

    fn retriever(
        records: Vec<serde_json::Value>,
    ) -> (DocumentRetriever, Arc<MockSearchBackend>, Arc<MockEmbeddingClient>) {
        let backend = Arc::new(MockSearchBackend::with_results(records));
        let embedder = Arc::new(MockEmbeddingClient::new(8));
        let retriever = DocumentRetriever::new(backend.clone(), embedder.clone());
        (retriever, backend, embedder)
    }

    #[tokio::test]
    async fn test_text_mode_never_embeds() {
        let (retriever, backend, embedder) = retriever(canned_records(2));

        let chunks = retriever
            .search_documents("travel policy", 5, SearchMode::Text)
            .await
            .unwrap();

        assert_eq!(embedder.call_count(), 0);
        assert_eq!(chunks.len(), 2);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].search.as_deref(), Some("travel policy"));
        assert!(requests[0].vector_queries.is_empty());
        assert_eq!(requests[0].top, 5);
    }

    #[tokio::test]
    async fn test_vector_mode_embeds_once_and_unsets_text() {
        let (retriever, backend, embedder) = retriever(canned_records(2));

        retriever
            .search_documents("travel policy", 4, SearchMode::Vector)
            .await
            .unwrap();

        assert_eq!(embedder.call_count(), 1);

        let requests = backend.requests();
        assert_eq!(requests[0].search, None);
        assert_eq!(requests[0].vector_queries.len(), 1);
        assert_eq!(requests[0].vector_queries[0].k, 4);
        assert_eq!(requests[0].vector_queries[0].fields, "text_vector");
        assert_eq!(requests[0].vector_queries[0].vector.len(), 8);
    }

    #[tokio::test]
    async fn test_hybrid_mode_embeds_once_and_carries_both() {
        let (retriever, backend, embedder) = retriever(canned_records(2));

        retriever
            .search_documents("travel policy", 3, SearchMode::Hybrid)
            .await
            .unwrap();

        assert_eq!(embedder.call_count(), 1);

        let requests = backend.requests();
        assert_eq!(requests[0].search.as_deref(), Some("travel policy"));
        assert_eq!(requests[0].vector_queries.len(), 1);
        assert_eq!(requests[0].vector_queries[0].k, 3);
        assert_eq!(requests[0].top, 3);
    }

    #[tokio::test]
    async fn test_top_k_honored_against_over_returning_backend() {
        // Backend hands back 5 records for a top_k=3 hybrid query.
        let (retriever, _backend, _embedder) = retriever(canned_records(5));

        let chunks = retriever
            .search_documents("travel policy", 3, SearchMode::Hybrid)
            .await
            .unwrap();

        assert_eq!(chunks.len(), 3);
        // Backend order preserved after truncation.
        assert_eq!(chunks[0].chunk_id, "c-0");
        assert_eq!(chunks[2].chunk_id, "c-2");
    }

    #[tokio::test]
    async fn test_each_query_embeds_fresh() {
        let (retriever, _backend, embedder) = retriever(canned_records(1));

        for _ in 0..3 {
            retriever
                .search_documents("same query", 1, SearchMode::Hybrid)
                .await
                .unwrap();
        }

        // One embedding call per query; nothing is cached.
        assert_eq!(embedder.call_count(), 3);
    }
}
