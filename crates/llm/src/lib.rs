//! Hosted-model clients for Enterprise QnA.
//!
//! Two trait seams, [`LlmClient`] for chat completions and
//! [`EmbeddingClient`] for query embeddings, with Azure OpenAI
//! implementations and deterministic mocks. Per the application's error
//! model, clients propagate backend failures unchanged: no retry, no
//! backoff, no fallback.

pub mod client;
pub mod embeddings;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatRole, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use embeddings::EmbeddingClient;
pub use providers::{AzureChatClient, AzureEmbeddingClient, MockEmbeddingClient, MockLlmClient};
