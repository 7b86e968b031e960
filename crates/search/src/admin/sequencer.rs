//! Ordered, idempotent provisioning of the ingestion pipeline.

use crate::admin::definitions::{
    AzureOpenAiParameters, DataSourceContainer, DataSourceCredentials, DataSourceDefinition,
    FieldDefinition, IndexDefinition, IndexProjections, IndexerDefinition, InputMapping,
    OutputMapping, ProjectionParameters, ProjectionSelector, Skill, SkillsetDefinition,
    VectorSearchAlgorithm, VectorSearchDefinition, VectorSearchProfile, Vectorizer,
};
use crate::admin::SearchAdminBackend;
use crate::backend::VECTOR_FIELD;
use qna_core::{AppConfig, AppResult, PipelineConfig};
use std::sync::Arc;

const HNSW_ALGORITHM: &str = "hnsw-algorithm";
const HNSW_PROFILE: &str = "hnsw-profile";
const OPENAI_VECTORIZER: &str = "openai-vectorizer";

/// Provisions the search index, data source, skillset, and indexer.
///
/// Each step is a create-or-update call; there is no rollback on partial
/// failure. If step N fails, steps 1..N-1 stay applied, and re-running the
/// whole sequence is safe. Completions are logged per step so an operator
/// can see where a failed run stopped.
pub struct IngestionPipeline {
    admin: Arc<dyn SearchAdminBackend>,
    index_name: String,
    pipeline: PipelineConfig,
    openai_endpoint: String,
    openai_api_key: String,
    embedding_deployment: String,
    embedding_dimensions: usize,
    max_page_length: u32,
    page_overlap_length: u32,
}

impl IngestionPipeline {
    /// Build the pipeline from configuration, failing fast (with the
    /// missing environment variable named) when the pipeline slice of the
    /// configuration is incomplete.
    pub fn from_config(admin: Arc<dyn SearchAdminBackend>, config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            admin,
            index_name: config.search_index.clone(),
            pipeline: config.pipeline()?,
            openai_endpoint: config.openai_endpoint.clone(),
            openai_api_key: config.openai_api_key.clone(),
            embedding_deployment: config.embedding_deployment.clone(),
            embedding_dimensions: config.embedding_dimensions,
            max_page_length: config.max_page_length,
            page_overlap_length: config.page_overlap_length,
        })
    }

    /// Full setup: index, data source, skillset, indexer, in that order.
    pub async fn setup(&self) -> AppResult<()> {
        let index = self.index_definition();
        self.admin.create_or_update_index(&index).await?;
        tracing::info!(index = %index.name, "Search index created or updated");

        let datasource = self.data_source_definition();
        self.admin.create_or_update_data_source(&datasource).await?;
        tracing::info!(datasource = %datasource.name, "Data source created or updated");

        let skillset = self.skillset_definition();
        self.admin.create_or_update_skillset(&skillset).await?;
        tracing::info!(skillset = %skillset.name, "Skillset created or updated");

        let indexer = self.indexer_definition();
        self.admin.create_or_update_indexer(&indexer).await?;
        tracing::info!(indexer = %indexer.name, "Indexer created and starting");

        Ok(())
    }

    /// Trigger a run of the already-provisioned indexer.
    pub async fn run(&self) -> AppResult<()> {
        self.admin.run_indexer(&self.pipeline.indexer).await?;
        tracing::info!(indexer = %self.pipeline.indexer, "Indexer run triggered");
        Ok(())
    }

    fn index_definition(&self) -> IndexDefinition {
        IndexDefinition {
            name: self.index_name.clone(),
            fields: vec![
                FieldDefinition::string("parent_id"),
                FieldDefinition::string("title"),
                FieldDefinition::key("chunk_id"),
                FieldDefinition::string("chunk"),
                FieldDefinition::vector(VECTOR_FIELD, self.embedding_dimensions, HNSW_PROFILE),
            ],
            vector_search: VectorSearchDefinition {
                algorithms: vec![VectorSearchAlgorithm {
                    name: HNSW_ALGORITHM.to_string(),
                    kind: "hnsw".to_string(),
                }],
                profiles: vec![VectorSearchProfile {
                    name: HNSW_PROFILE.to_string(),
                    algorithm: HNSW_ALGORITHM.to_string(),
                    vectorizer: OPENAI_VECTORIZER.to_string(),
                }],
                vectorizers: vec![Vectorizer {
                    name: OPENAI_VECTORIZER.to_string(),
                    kind: "azureOpenAI".to_string(),
                    parameters: AzureOpenAiParameters {
                        resource_uri: self.openai_endpoint.clone(),
                        api_key: self.openai_api_key.clone(),
                        deployment_id: self.embedding_deployment.clone(),
                        model_name: self.embedding_deployment.clone(),
                    },
                }],
            },
        }
    }

    fn data_source_definition(&self) -> DataSourceDefinition {
        DataSourceDefinition {
            name: self.pipeline.datasource.clone(),
            source_type: "azureblob".to_string(),
            credentials: DataSourceCredentials {
                connection_string: self.pipeline.blob_connection_string.clone(),
            },
            container: DataSourceContainer {
                name: self.pipeline.blob_container.clone(),
            },
        }
    }

    fn skillset_definition(&self) -> SkillsetDefinition {
        let split = Skill::Split {
            description: "Split documents into overlapping pages".to_string(),
            context: "/document".to_string(),
            text_split_mode: "pages".to_string(),
            maximum_page_length: self.max_page_length,
            page_overlap_length: self.page_overlap_length,
            inputs: vec![InputMapping::new("text", "/document/content")],
            outputs: vec![OutputMapping::new("textItems", "pages")],
        };

        let embed = Skill::AzureOpenAiEmbedding {
            description: "Generate embeddings for each page".to_string(),
            context: "/document/pages/*".to_string(),
            resource_uri: self.openai_endpoint.clone(),
            api_key: self.openai_api_key.clone(),
            deployment_id: self.embedding_deployment.clone(),
            model_name: self.embedding_deployment.clone(),
            dimensions: self.embedding_dimensions,
            inputs: vec![InputMapping::new("text", "/document/pages/*")],
            outputs: vec![OutputMapping::new("embedding", VECTOR_FIELD)],
        };

        SkillsetDefinition {
            name: self.pipeline.skillset.clone(),
            description: "Chunk documents and generate embeddings".to_string(),
            skills: vec![split, embed],
            index_projections: IndexProjections {
                selectors: vec![ProjectionSelector {
                    target_index_name: self.index_name.clone(),
                    parent_key_field_name: "parent_id".to_string(),
                    source_context: "/document/pages/*".to_string(),
                    mappings: vec![
                        InputMapping::new("chunk", "/document/pages/*"),
                        InputMapping::new(VECTOR_FIELD, "/document/pages/*/text_vector"),
                        InputMapping::new("title", "/document/metadata_storage_name"),
                    ],
                }],
                parameters: ProjectionParameters {
                    projection_mode: "skipIndexingParentDocuments".to_string(),
                },
            },
        }
    }

    fn indexer_definition(&self) -> IndexerDefinition {
        IndexerDefinition {
            name: self.pipeline.indexer.clone(),
            description: "Index documents and generate embeddings".to_string(),
            data_source_name: self.pipeline.datasource.clone(),
            skillset_name: self.pipeline.skillset.clone(),
            target_index_name: self.index_name.clone(),
        }
    }
}
