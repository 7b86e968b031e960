//! Index provisioning: definitions, admin client seam, and the sequencer.

use qna_core::AppResult;

pub mod azure;
pub mod definitions;
pub mod sequencer;

pub use azure::AzureSearchAdmin;
pub use definitions::{
    DataSourceDefinition, FieldDefinition, IndexDefinition, IndexerDefinition, SkillsetDefinition,
};
pub use sequencer::IngestionPipeline;

/// Trait for the search service's management surface.
///
/// Every create-or-update call is idempotent on the service side, so any
/// step of the provisioning sequence is safe to re-run.
#[async_trait::async_trait]
pub trait SearchAdminBackend: Send + Sync {
    async fn create_or_update_index(&self, index: &definitions::IndexDefinition) -> AppResult<()>;

    async fn create_or_update_data_source(
        &self,
        datasource: &definitions::DataSourceDefinition,
    ) -> AppResult<()>;

    async fn create_or_update_skillset(
        &self,
        skillset: &definitions::SkillsetDefinition,
    ) -> AppResult<()>;

    async fn create_or_update_indexer(
        &self,
        indexer: &definitions::IndexerDefinition,
    ) -> AppResult<()>;

    /// Trigger a run of an existing indexer.
    async fn run_indexer(&self, name: &str) -> AppResult<()>;
}
