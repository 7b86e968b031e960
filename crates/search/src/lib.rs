//! Retrieval and index provisioning for Enterprise QnA.
//!
//! The query path (mode-dependent parameter shaping, the search backend
//! seam, and result normalization) lives here, alongside the typed
//! provisioning definitions and the ordered ingestion sequencer.

pub mod admin;
pub mod backend;
pub mod normalize;
pub mod retriever;
pub mod types;

// Re-export main types
pub use admin::{AzureSearchAdmin, IngestionPipeline, SearchAdminBackend};
pub use backend::{AzureSearchBackend, MockSearchBackend, SearchBackend, SearchRequest, VectorQuery};
pub use normalize::normalize;
pub use retriever::DocumentRetriever;
pub use types::{RetrievedChunk, SearchMode};
