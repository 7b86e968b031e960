//! Grounded prompt assembly.
//!
//! The fixed instructions and the retrieved context render into a single
//! system message; the turn history (ending with the current question)
//! follows as ordinary chat messages, so the model sees the whole
//! conversation on every call.

use crate::types::{ConversationTurn, Role};
use handlebars::Handlebars;
use qna_core::{AppError, AppResult};
use qna_llm::{ChatMessage, LlmRequest};
use qna_search::RetrievedChunk;
use serde_json::json;

/// Handlebars template for the grounded system message.
const GROUNDED_TEMPLATE: &str = "\
You are an assistant answering enterprise policy questions from the \
company's internal documents.

Instructions:
- Answer using only the sources listed below
- Keep the answer concise and factual
- Do not mention the sources, their titles, or that you were given context
- If the sources do not contain the answer, say you could not find this \
information in the available documents

Sources:
{{#each context}}
[{{title}}] {{chunk}}
{{/each}}";

/// Render the system message from the retrieved chunks.
pub fn render_system_prompt(chunks: &[RetrievedChunk]) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output, no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("grounded", GROUNDED_TEMPLATE)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("grounded", &json!({ "context": chunks }))
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Assemble the full generation request: system message first, then every
/// turn of the history in order. The caller guarantees the history ends
/// with the current user question.
pub fn build_request(
    chunks: &[RetrievedChunk],
    history: &[ConversationTurn],
) -> AppResult<LlmRequest> {
    let system = render_system_prompt(chunks)?;

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system));
    for turn in history {
        messages.push(match turn.role {
            Role::User => ChatMessage::user(turn.content.clone()),
            Role::Assistant => ChatMessage::assistant(turn.content.clone()),
        });
    }

    Ok(LlmRequest::new(messages))
}
