//! Azure AI Search management client.

use crate::admin::definitions::{
    DataSourceDefinition, IndexDefinition, IndexerDefinition, SkillsetDefinition,
};
use crate::admin::SearchAdminBackend;
use crate::backend::SEARCH_API_VERSION;
use qna_core::{AppConfig, AppError, AppResult};
use serde::Serialize;

/// Management client for an Azure AI Search service.
///
/// Create-or-update operations are `PUT`s against the named resource;
/// indexer runs are `POST`s. Both carry the admin key.
pub struct AzureSearchAdmin {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AzureSearchAdmin {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.search_endpoint, &config.search_api_key)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            self.endpoint, path, SEARCH_API_VERSION
        )
    }

    async fn put<T: Serialize + Sync>(&self, path: &str, body: &T) -> AppResult<()> {
        let response = self
            .client
            .put(self.url(path))
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Ingestion(format!("Failed to reach search service: {}", e)))?;

        self.check(path, response).await
    }

    async fn check(&self, path: &str, response: reqwest::Response) -> AppResult<()> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Ingestion(format!(
                "Search service error on {} ({}): {}",
                path, status, error_text
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SearchAdminBackend for AzureSearchAdmin {
    async fn create_or_update_index(&self, index: &IndexDefinition) -> AppResult<()> {
        self.put(&format!("indexes/{}", index.name), index).await
    }

    async fn create_or_update_data_source(
        &self,
        datasource: &DataSourceDefinition,
    ) -> AppResult<()> {
        self.put(&format!("datasources/{}", datasource.name), datasource)
            .await
    }

    async fn create_or_update_skillset(&self, skillset: &SkillsetDefinition) -> AppResult<()> {
        self.put(&format!("skillsets/{}", skillset.name), skillset)
            .await
    }

    async fn create_or_update_indexer(&self, indexer: &IndexerDefinition) -> AppResult<()> {
        self.put(&format!("indexers/{}", indexer.name), indexer)
            .await
    }

    async fn run_indexer(&self, name: &str) -> AppResult<()> {
        let path = format!("indexers/{}/run", name);
        let response = self
            .client
            .post(self.url(&path))
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Ingestion(format!("Failed to reach search service: {}", e)))?;

        self.check(&path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_shape() {
        let admin = AzureSearchAdmin::new("https://svc.search.windows.net/", "key");
        assert_eq!(
            admin.url("indexers/docs-indexer/run"),
            "https://svc.search.windows.net/indexers/docs-indexer/run?api-version=2024-07-01"
        );
    }
}
