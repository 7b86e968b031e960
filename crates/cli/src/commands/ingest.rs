//! Ingest command handler.

use clap::Args;
use qna_core::{AppConfig, AppResult};
use qna_search::{AzureSearchAdmin, IngestionPipeline};
use std::sync::Arc;

/// Provision or run the ingestion pipeline
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Provision the full pipeline (index, data source, skillset, indexer)
    /// instead of only triggering an indexer run
    #[arg(long)]
    pub create_indexer: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let admin = Arc::new(AzureSearchAdmin::from_config(config));
        let pipeline = IngestionPipeline::from_config(admin, config)?;

        if self.create_indexer {
            tracing::info!("Setting up the ingestion pipeline");
            pipeline.setup().await?;
            println!(
                "Ingestion pipeline provisioned; give the indexer a few minutes before querying."
            );
        } else {
            tracing::info!("Indexer creation skipped; triggering a run");
            pipeline.run().await?;
            println!("Indexer running; give it a few minutes before querying.");
        }

        Ok(())
    }
}
