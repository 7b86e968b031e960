//! Retrieval domain types.

use serde::{Deserialize, Serialize};

/// Search execution mode for one query.
///
/// The mode is fixed per call; a single query never mixes modes. Hybrid
/// fusion of lexical and vector relevance happens inside the search
/// backend, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Lexical query only; no embedding call is made
    Text,
    /// Embedding-similarity query only; lexical text is left unset
    Vector,
    /// One query carrying both the lexical text and the vector clause
    Hybrid,
}

impl SearchMode {
    /// Parse a mode from its CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "vector" => Some(Self::Vector),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Vector => "vector",
            Self::Hybrid => "hybrid",
        }
    }
}

/// A retrieved document chunk in uniform shape.
///
/// Every field defaults (empty string / 0.0) when the source record lacks
/// it; lists of chunks preserve the order the backend returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub title: String,
    pub chunk: String,
    pub chunk_id: String,
    pub parent_id: String,
    pub score: f64,
}
