//! Azure AI Search query backend.

use crate::backend::{SearchBackend, SearchRequest, SEARCH_API_VERSION};
use qna_core::{AppConfig, AppError, AppResult};
use serde::Deserialize;

/// Search response envelope; each record keeps its raw JSON shape so the
/// normalizer owns all field handling.
#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

/// Query client for one index of an Azure AI Search service.
pub struct AzureSearchBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    index: String,
}

impl AzureSearchBackend {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            index: index.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.search_endpoint,
            &config.search_api_key,
            &config.search_index,
        )
    }

    fn url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, SEARCH_API_VERSION
        )
    }
}

#[async_trait::async_trait]
impl SearchBackend for AzureSearchBackend {
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<serde_json::Value>> {
        tracing::debug!(index = %self.index, top = request.top, "Executing search query");

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to reach search service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Search service error ({}): {}",
                status, error_text
            )));
        }

        let results: SearchResults = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        tracing::debug!(count = results.value.len(), "Search query returned");

        Ok(results.value)
    }
}
