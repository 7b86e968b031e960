//! Command handlers for the Enterprise QnA CLI.

pub mod chat;
pub mod ingest;
pub mod search;

// Re-export command types for convenience
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use search::SearchCommand;
