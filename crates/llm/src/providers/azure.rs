//! Azure OpenAI provider implementations.
//!
//! Both clients speak the deployment-scoped REST surface:
//! `POST {endpoint}/openai/deployments/{deployment}/{operation}?api-version=...`
//! authenticated with the `api-key` header. Transport and API failures are
//! wrapped with their category and propagated; there is no retry loop.

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::embeddings::EmbeddingClient;
use qna_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Chat-completions request payload.
#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat-completions response payload.
#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<UsagePayload>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct UsagePayload {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Embeddings request payload. `dimensions` pins the output length for
/// models that support shortened embeddings.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Azure OpenAI chat-completions client.
pub struct AzureChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
}

impl AzureChatClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: trim_endpoint(endpoint.into()),
            api_key: api_key.into(),
            api_version: api_version.into(),
            deployment: deployment.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.openai_endpoint,
            &config.openai_api_key,
            &config.openai_api_version,
            &config.chat_deployment,
        )
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait::async_trait]
impl LlmClient for AzureChatClient {
    fn provider_name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(deployment = %self.deployment, "Sending chat-completion request");
        tracing::debug!(messages = request.messages.len(), "Request size");

        let payload = ChatCompletionsRequest {
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to reach Azure OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "Azure OpenAI error ({}): {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to parse completion: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Generation("Completion returned no choices".to_string()))?;

        let usage = completion.usage.unwrap_or_default();

        tracing::info!("Received chat completion");

        Ok(LlmResponse {
            content: choice.message.content,
            model: completion.model,
            usage: LlmUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }
}

/// Azure OpenAI embeddings client with fixed model and dimensionality.
pub struct AzureEmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
    dimensions: usize,
}

impl AzureEmbeddingClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        deployment: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: trim_endpoint(endpoint.into()),
            api_key: api_key.into(),
            api_version: api_version.into(),
            deployment: deployment.into(),
            dimensions,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.openai_endpoint,
            &config.openai_api_key,
            &config.openai_api_version,
            &config.embedding_deployment,
            config.embedding_dimensions,
        )
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait::async_trait]
impl EmbeddingClient for AzureEmbeddingClient {
    fn model_name(&self) -> &str {
        &self.deployment
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        tracing::debug!(deployment = %self.deployment, text_len = text.len(), "Embedding query text");

        let payload = EmbeddingsRequest {
            input: text,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to reach Azure OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "Azure OpenAI error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse embedding: {}", e)))?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Embedding("Embedding response had no data".to_string()))?;

        if embedding.len() != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                embedding.len(),
                self.dimensions
            )));
        }

        Ok(embedding)
    }
}

/// Endpoint URLs are configured with and without trailing slashes.
fn trim_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_shape() {
        let client = AzureChatClient::new(
            "https://res.openai.azure.com/",
            "key",
            "2024-10-21",
            "gpt-4o",
        );
        assert_eq!(
            client.url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn test_embeddings_url_shape() {
        let client = AzureEmbeddingClient::new(
            "https://res.openai.azure.com",
            "key",
            "2024-10-21",
            "text-embedding-3-large",
            1024,
        );
        assert_eq!(
            client.url(),
            "https://res.openai.azure.com/openai/deployments/text-embedding-3-large/embeddings?api-version=2024-10-21"
        );
        assert_eq!(client.dimensions(), 1024);
        assert_eq!(client.model_name(), "text-embedding-3-large");
    }

    #[test]
    fn test_chat_request_payload_omits_unset_options() {
        let request = LlmRequest::new(vec![ChatMessage::user("q")]);
        let payload = ChatCompletionsRequest {
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_completion_response_parsing() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "An answer."}}],
            "model": "gpt-4o",
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let parsed: ChatCompletionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "An answer.");
        assert_eq!(parsed.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_embeddings_response_parsing() {
        let body = r#"{"data": [{"embedding": [0.1, -0.2, 0.3], "index": 0}], "model": "text-embedding-3-large"}"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data[0].embedding.len(), 3);
    }
}
