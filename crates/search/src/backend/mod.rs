//! Search backend seam: query wire types and the execution trait.
//!
//! The request mirrors the search service's REST contract, so the shaping
//! done by the retriever serializes directly into the query payload.

use qna_core::AppResult;
use serde::Serialize;

pub mod azure;
pub mod mock;

pub use azure::AzureSearchBackend;
pub use mock::MockSearchBackend;

/// REST api-version spoken by the search service clients.
pub const SEARCH_API_VERSION: &str = "2024-07-01";

/// Fields selected for every query.
pub const SELECT_FIELDS: &str = "title,chunk,chunk_id,parent_id";

/// Vector field targeted by vector and hybrid queries.
pub const VECTOR_FIELD: &str = "text_vector";

/// One vector clause of a search request: the k nearest neighbors of
/// `vector` on the designated vector field.
#[derive(Debug, Clone, Serialize)]
pub struct VectorQuery {
    pub kind: String,
    pub vector: Vec<f32>,
    pub k: usize,
    pub fields: String,
}

impl VectorQuery {
    pub fn nearest(vector: Vec<f32>, k: usize) -> Self {
        Self {
            kind: "vector".to_string(),
            vector,
            k,
            fields: VECTOR_FIELD.to_string(),
        }
    }
}

/// The parameter set for a single search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// Lexical query text; absent signals vector-only to the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Vector clauses; empty for lexical-only queries
    #[serde(rename = "vectorQueries", skip_serializing_if = "Vec::is_empty")]
    pub vector_queries: Vec<VectorQuery>,

    /// Maximum result count requested from the backend
    pub top: usize,

    /// Comma-separated list of fields to retrieve
    pub select: String,
}

/// Trait for query-serving search backends.
///
/// Ranking, hybrid fusion, and tie-breaking all happen behind this seam;
/// callers only shape parameters and consume records.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute one query, returning raw result records in backend order.
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<serde_json::Value>>;
}
