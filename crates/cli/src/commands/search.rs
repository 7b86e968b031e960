//! Search command handler: retrieval without generation.

use clap::Args;
use qna_core::{AppConfig, AppError, AppResult};
use qna_llm::AzureEmbeddingClient;
use qna_search::{AzureSearchBackend, DocumentRetriever, SearchMode};
use std::sync::Arc;

/// Run a retrieval-only query and print the normalized chunks as JSON
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The query text
    pub query: String,

    /// Search mode: text, vector, or hybrid
    #[arg(long, default_value = "hybrid")]
    pub mode: String,

    /// Number of chunks to retrieve
    #[arg(long, default_value_t = 3)]
    pub top_k: usize,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mode = SearchMode::parse(&self.mode).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown search mode: {}. Supported: text, vector, hybrid",
                self.mode
            ))
        })?;

        let backend = Arc::new(AzureSearchBackend::from_config(config));
        let embedder = Arc::new(AzureEmbeddingClient::from_config(config));
        let retriever = DocumentRetriever::new(backend, embedder);

        let chunks = retriever
            .search_documents(&self.query, self.top_k, mode)
            .await?;

        println!("{}", serde_json::to_string_pretty(&chunks)?);

        Ok(())
    }
}
