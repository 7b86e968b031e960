//! Provider implementations for the generation and embedding traits.

pub mod azure;
pub mod mock;

pub use azure::{AzureChatClient, AzureEmbeddingClient};
pub use mock::{MockEmbeddingClient, MockLlmClient};
