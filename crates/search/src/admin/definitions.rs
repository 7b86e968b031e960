//! Provisioning definitions: index schema, data source, skillset, indexer.
//!
//! These serialize directly into the search service's management REST
//! bodies, hence the camelCase and `@odata.type` field names.

use serde::Serialize;

/// Search index definition with a vector-search section.
#[derive(Debug, Clone, Serialize)]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(rename = "vectorSearch")]
    pub vector_search: VectorSearchDefinition,
}

/// One index field. Only the attributes a field actually sets are
/// serialized; the service applies its defaults for the rest.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facetable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(rename = "vectorSearchProfile", skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

impl FieldDefinition {
    /// Plain string field.
    pub fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "Edm.String".to_string(),
            key: None,
            searchable: None,
            sortable: None,
            filterable: None,
            facetable: None,
            analyzer: None,
            dimensions: None,
            vector_search_profile: None,
        }
    }

    /// Document key field with the keyword analyzer.
    pub fn key(name: &str) -> Self {
        Self {
            key: Some(true),
            sortable: Some(true),
            filterable: Some(true),
            facetable: Some(true),
            analyzer: Some("keyword".to_string()),
            ..Self::string(name)
        }
    }

    /// Vector field bound to a vector-search profile.
    pub fn vector(name: &str, dimensions: usize, profile: &str) -> Self {
        Self {
            field_type: "Collection(Edm.Single)".to_string(),
            searchable: Some(true),
            dimensions: Some(dimensions),
            vector_search_profile: Some(profile.to_string()),
            ..Self::string(name)
        }
    }
}

/// Vector-search section: HNSW algorithm, profile, and vectorizer.
#[derive(Debug, Clone, Serialize)]
pub struct VectorSearchDefinition {
    pub algorithms: Vec<VectorSearchAlgorithm>,
    pub profiles: Vec<VectorSearchProfile>,
    pub vectorizers: Vec<Vectorizer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorSearchAlgorithm {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorSearchProfile {
    pub name: String,
    pub algorithm: String,
    pub vectorizer: String,
}

/// Query-time vectorizer pointing at the embedding deployment, so the
/// service can embed free text on its own (e.g., for the portal's search
/// explorer).
#[derive(Debug, Clone, Serialize)]
pub struct Vectorizer {
    pub name: String,
    pub kind: String,
    #[serde(rename = "azureOpenAIParameters")]
    pub parameters: AzureOpenAiParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureOpenAiParameters {
    pub resource_uri: String,
    pub api_key: String,
    pub deployment_id: String,
    pub model_name: String,
}

/// Blob data-source connection.
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub credentials: DataSourceCredentials,
    pub container: DataSourceContainer,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSourceCredentials {
    #[serde(rename = "connectionString")]
    pub connection_string: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSourceContainer {
    pub name: String,
}

/// Enrichment skillset: chunking, embedding, and index projections.
#[derive(Debug, Clone, Serialize)]
pub struct SkillsetDefinition {
    pub name: String,
    pub description: String,
    pub skills: Vec<Skill>,
    #[serde(rename = "indexProjections")]
    pub index_projections: IndexProjections,
}

/// A skillset member, discriminated by its `@odata.type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "@odata.type")]
pub enum Skill {
    /// Splits document content into overlapping pages.
    #[serde(rename = "#Microsoft.Skills.Text.SplitSkill")]
    #[serde(rename_all = "camelCase")]
    Split {
        description: String,
        context: String,
        text_split_mode: String,
        maximum_page_length: u32,
        page_overlap_length: u32,
        inputs: Vec<InputMapping>,
        outputs: Vec<OutputMapping>,
    },

    /// Embeds each page via the Azure OpenAI deployment.
    #[serde(rename = "#Microsoft.Skills.Text.AzureOpenAIEmbeddingSkill")]
    #[serde(rename_all = "camelCase")]
    AzureOpenAiEmbedding {
        description: String,
        context: String,
        resource_uri: String,
        api_key: String,
        deployment_id: String,
        model_name: String,
        dimensions: usize,
        inputs: Vec<InputMapping>,
        outputs: Vec<OutputMapping>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMapping {
    pub name: String,
    pub source: String,
}

impl InputMapping {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputMapping {
    pub name: String,
    #[serde(rename = "targetName")]
    pub target_name: String,
}

impl OutputMapping {
    pub fn new(name: &str, target_name: &str) -> Self {
        Self {
            name: name.to_string(),
            target_name: target_name.to_string(),
        }
    }
}

/// Projection of enriched pages into the chunk index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexProjections {
    pub selectors: Vec<ProjectionSelector>,
    pub parameters: ProjectionParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSelector {
    pub target_index_name: String,
    pub parent_key_field_name: String,
    pub source_context: String,
    pub mappings: Vec<InputMapping>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionParameters {
    #[serde(rename = "projectionMode")]
    pub projection_mode: String,
}

/// Indexer binding data source, skillset, and target index together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerDefinition {
    pub name: String,
    pub description: String,
    pub data_source_name: String,
    pub skillset_name: String,
    pub target_index_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_field_serialization() {
        let json = serde_json::to_value(FieldDefinition::key("chunk_id")).unwrap();
        assert_eq!(json["name"], "chunk_id");
        assert_eq!(json["type"], "Edm.String");
        assert_eq!(json["key"], true);
        assert_eq!(json["analyzer"], "keyword");
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_vector_field_serialization() {
        let json = serde_json::to_value(FieldDefinition::vector("text_vector", 1024, "hnsw-profile"))
            .unwrap();
        assert_eq!(json["type"], "Collection(Edm.Single)");
        assert_eq!(json["dimensions"], 1024);
        assert_eq!(json["vectorSearchProfile"], "hnsw-profile");
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_plain_field_omits_unset_attributes() {
        let json = serde_json::to_value(FieldDefinition::string("title")).unwrap();
        assert_eq!(
            json.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["name", "type"]
        );
    }

    #[test]
    fn test_skill_discriminator_and_casing() {
        let skill = Skill::Split {
            description: "Split documents".to_string(),
            context: "/document".to_string(),
            text_split_mode: "pages".to_string(),
            maximum_page_length: 2000,
            page_overlap_length: 500,
            inputs: vec![InputMapping::new("text", "/document/content")],
            outputs: vec![OutputMapping::new("textItems", "pages")],
        };

        let json = serde_json::to_value(&skill).unwrap();
        assert_eq!(json["@odata.type"], "#Microsoft.Skills.Text.SplitSkill");
        assert_eq!(json["textSplitMode"], "pages");
        assert_eq!(json["maximumPageLength"], 2000);
        assert_eq!(json["outputs"][0]["targetName"], "pages");
    }

    #[test]
    fn test_embedding_skill_serialization() {
        let skill = Skill::AzureOpenAiEmbedding {
            description: "Embed pages".to_string(),
            context: "/document/pages/*".to_string(),
            resource_uri: "https://res.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            deployment_id: "text-embedding-3-large".to_string(),
            model_name: "text-embedding-3-large".to_string(),
            dimensions: 1024,
            inputs: vec![InputMapping::new("text", "/document/pages/*")],
            outputs: vec![OutputMapping::new("embedding", "text_vector")],
        };

        let json = serde_json::to_value(&skill).unwrap();
        assert_eq!(
            json["@odata.type"],
            "#Microsoft.Skills.Text.AzureOpenAIEmbeddingSkill"
        );
        assert_eq!(json["resourceUri"], "https://res.openai.azure.com");
        assert_eq!(json["deploymentId"], "text-embedding-3-large");
        assert_eq!(json["dimensions"], 1024);
    }

    #[test]
    fn test_indexer_serialization() {
        let indexer = IndexerDefinition {
            name: "docs-indexer".to_string(),
            description: "Index documents".to_string(),
            data_source_name: "docs-datasource".to_string(),
            skillset_name: "docs-skillset".to_string(),
            target_index_name: "enterprise-docs".to_string(),
        };

        let json = serde_json::to_value(&indexer).unwrap();
        assert_eq!(json["dataSourceName"], "docs-datasource");
        assert_eq!(json["skillsetName"], "docs-skillset");
        assert_eq!(json["targetIndexName"], "enterprise-docs");
    }
}
