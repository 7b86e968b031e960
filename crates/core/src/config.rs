//! Configuration for the Enterprise QnA services.
//!
//! Configuration is resolved once at startup into an explicit [`AppConfig`]
//! that is passed by reference to every component constructor. Sources, in
//! increasing precedence:
//! - an optional YAML config file (`--config`, `QNA_CONFIG`, or `./qna.yaml`)
//! - environment variables
//! - command-line flags (applied via [`AppConfig::with_overrides`])
//!
//! Values required by every command (search service, Azure OpenAI) are
//! validated eagerly in [`AppConfig::load`]; values only the ingestion
//! pipeline needs are validated by [`AppConfig::pipeline`] so that chat and
//! search sessions never demand blob credentials.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default Azure OpenAI REST api-version.
const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Default embedding deployment and its fixed dimensionality.
const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-3-large";
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;

/// Default chat-completion deployment.
const DEFAULT_CHAT_DEPLOYMENT: &str = "gpt-4o";

/// Default document chunking parameters, consumed by the split skill.
const DEFAULT_MAX_PAGE_LENGTH: u32 = 2000;
const DEFAULT_PAGE_OVERLAP_LENGTH: u32 = 500;

/// Main application configuration.
///
/// Secrets (`AZURE_SEARCH_ADMIN_KEY`, `AZURE_OPENAI_KEY`) are normally
/// supplied through the environment; the YAML file is accepted as a
/// development convenience and the environment always wins.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Search service endpoint URL
    pub search_endpoint: String,

    /// Search service admin key
    pub search_api_key: String,

    /// Name of the search index queried and provisioned
    pub search_index: String,

    /// Data-source connection name (ingestion only)
    pub search_datasource: Option<String>,

    /// Skillset name (ingestion only)
    pub search_skillset: Option<String>,

    /// Indexer name (ingestion only)
    pub search_indexer: Option<String>,

    /// Azure OpenAI resource endpoint URL
    pub openai_endpoint: String,

    /// Azure OpenAI API key
    pub openai_api_key: String,

    /// Azure OpenAI REST api-version
    pub openai_api_version: String,

    /// Embedding model deployment name
    pub embedding_deployment: String,

    /// Fixed embedding dimensionality
    pub embedding_dimensions: usize,

    /// Chat-completion model deployment name
    pub chat_deployment: String,

    /// Blob storage connection string (ingestion only)
    pub blob_connection_string: Option<String>,

    /// Blob container holding the source documents (ingestion only)
    pub blob_container: Option<String>,

    /// Maximum characters per document chunk
    pub max_page_length: u32,

    /// Overlap between consecutive chunks, in characters
    pub page_overlap_length: u32,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// The ingestion pipeline's slice of the configuration, with every value
/// present. Produced by [`AppConfig::pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub datasource: String,
    pub skillset: String,
    pub indexer: String,
    pub blob_connection_string: String,
    pub blob_container: String,
}

/// YAML config file structure. Every field is optional; anything absent
/// falls back to the environment or a built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchSection>,
    openai: Option<OpenAiSection>,
    blob: Option<BlobSection>,
    chunking: Option<ChunkingSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SearchSection {
    endpoint: Option<String>,
    #[serde(rename = "adminKey")]
    admin_key: Option<String>,
    index: Option<String>,
    datasource: Option<String>,
    skillset: Option<String>,
    indexer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OpenAiSection {
    endpoint: Option<String>,
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
    #[serde(rename = "apiVersion")]
    api_version: Option<String>,
    #[serde(rename = "embeddingDeployment")]
    embedding_deployment: Option<String>,
    #[serde(rename = "embeddingDimensions")]
    embedding_dimensions: Option<usize>,
    #[serde(rename = "chatDeployment")]
    chat_deployment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BlobSection {
    #[serde(rename = "connectionString")]
    connection_string: Option<String>,
    container: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChunkingSection {
    #[serde(rename = "maxPageLength")]
    max_page_length: Option<u32>,
    #[serde(rename = "pageOverlapLength")]
    page_overlap_length: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// `config_file` is the CLI-supplied path; when `None`, `QNA_CONFIG` is
    /// consulted, then `./qna.yaml`. Required values missing from every
    /// source fail immediately with a [`AppError::Config`] naming the
    /// environment variable.
    ///
    /// Environment variables:
    /// - `AZURE_SEARCH_SERVICE_ENDPOINT`, `AZURE_SEARCH_ADMIN_KEY`,
    ///   `AZURE_SEARCH_INDEX` (required)
    /// - `AZURE_SEARCH_DATASOURCE`, `AZURE_SEARCH_SKILLSET`,
    ///   `AZURE_SEARCH_INDEXER` (ingestion)
    /// - `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_KEY` (required)
    /// - `AZURE_OPENAI_API_VERSION`, `AZURE_OPENAI_EMBEDDING_DEPLOYMENT`,
    ///   `AZURE_OPENAI_CHAT_DEPLOYMENT` (defaulted)
    /// - `AZURE_BLOB_CONNECTION_STRING`, `AZURE_BLOB_CONTAINER` (ingestion)
    /// - `RUST_LOG`, `NO_COLOR`
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let file = Self::read_config_file(config_file)?;

        let search = file.search.unwrap_or_default();
        let openai = file.openai.unwrap_or_default();
        let blob = file.blob.unwrap_or_default();
        let chunking = file.chunking.unwrap_or_default();
        let logging = file.logging.unwrap_or_default();

        let config = Self {
            search_endpoint: require(
                env_or("AZURE_SEARCH_SERVICE_ENDPOINT", search.endpoint),
                "AZURE_SEARCH_SERVICE_ENDPOINT",
            )?,
            search_api_key: require(
                env_or("AZURE_SEARCH_ADMIN_KEY", search.admin_key),
                "AZURE_SEARCH_ADMIN_KEY",
            )?,
            search_index: require(env_or("AZURE_SEARCH_INDEX", search.index), "AZURE_SEARCH_INDEX")?,
            search_datasource: env_or("AZURE_SEARCH_DATASOURCE", search.datasource),
            search_skillset: env_or("AZURE_SEARCH_SKILLSET", search.skillset),
            search_indexer: env_or("AZURE_SEARCH_INDEXER", search.indexer),
            openai_endpoint: require(
                env_or("AZURE_OPENAI_ENDPOINT", openai.endpoint),
                "AZURE_OPENAI_ENDPOINT",
            )?,
            openai_api_key: require(env_or("AZURE_OPENAI_KEY", openai.api_key), "AZURE_OPENAI_KEY")?,
            openai_api_version: env_or("AZURE_OPENAI_API_VERSION", openai.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            embedding_deployment: env_or(
                "AZURE_OPENAI_EMBEDDING_DEPLOYMENT",
                openai.embedding_deployment,
            )
            .unwrap_or_else(|| DEFAULT_EMBEDDING_DEPLOYMENT.to_string()),
            embedding_dimensions: openai
                .embedding_dimensions
                .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS),
            chat_deployment: env_or("AZURE_OPENAI_CHAT_DEPLOYMENT", openai.chat_deployment)
                .unwrap_or_else(|| DEFAULT_CHAT_DEPLOYMENT.to_string()),
            blob_connection_string: env_or("AZURE_BLOB_CONNECTION_STRING", blob.connection_string),
            blob_container: env_or("AZURE_BLOB_CONTAINER", blob.container),
            max_page_length: chunking.max_page_length.unwrap_or(DEFAULT_MAX_PAGE_LENGTH),
            page_overlap_length: chunking
                .page_overlap_length
                .unwrap_or(DEFAULT_PAGE_OVERLAP_LENGTH),
            log_level: std::env::var("RUST_LOG").ok().or(logging.level),
            verbose: false,
            no_color: std::env::var("NO_COLOR").is_ok() || logging.color == Some(false),
        };

        Ok(config)
    }

    /// Locate and parse the YAML config file, if any.
    fn read_config_file(explicit: Option<&Path>) -> AppResult<ConfigFile> {
        let path: Option<PathBuf> = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("QNA_CONFIG").ok().map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from("qna.yaml");
                default.exists().then_some(default)
            });

        let Some(path) = path else {
            return Ok(ConfigFile::default());
        };

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        serde_yaml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Apply CLI flag overrides, giving them final precedence.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the ingestion pipeline's configuration slice, failing with
    /// the missing environment variable's name if any piece is absent.
    pub fn pipeline(&self) -> AppResult<PipelineConfig> {
        Ok(PipelineConfig {
            datasource: require(self.search_datasource.clone(), "AZURE_SEARCH_DATASOURCE")?,
            skillset: require(self.search_skillset.clone(), "AZURE_SEARCH_SKILLSET")?,
            indexer: require(self.search_indexer.clone(), "AZURE_SEARCH_INDEXER")?,
            blob_connection_string: require(
                self.blob_connection_string.clone(),
                "AZURE_BLOB_CONNECTION_STRING",
            )?,
            blob_container: require(self.blob_container.clone(), "AZURE_BLOB_CONTAINER")?,
        })
    }
}

/// Environment variable value, falling back to the config-file value.
fn env_or(var: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(var).ok().or(fallback)
}

fn require(value: Option<String>, var: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::Config(format!("Missing required environment variable: {}", var)))
}
