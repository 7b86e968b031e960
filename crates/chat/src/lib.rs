//! Chat orchestration for Enterprise QnA.
//!
//! [`RagChat`] drives one session: it retrieves hybrid-search context for
//! each question, assembles a grounded prompt with the full turn history,
//! executes it against the generation client, and records both turns.

pub mod orchestrator;
pub mod prompt;
pub mod types;

// Re-export main types
pub use orchestrator::RagChat;
pub use types::{ConversationTurn, Role};
