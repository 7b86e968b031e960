//! Conversation orchestration: retrieve, ground, generate, remember.

use crate::prompt;
use crate::types::ConversationTurn;
use qna_core::AppResult;
use qna_llm::LlmClient;
use qna_search::{DocumentRetriever, SearchMode};
use std::sync::Arc;

/// Number of context chunks retrieved per question.
const DEFAULT_TOP_K: usize = 3;

/// Sampling temperature for grounded answers.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// One chat session over the document index.
///
/// The session owns its turn history exclusively: turns are appended in
/// strict chronological order and only an explicit limit set through
/// [`RagChat::with_history_limit`] ever removes them, oldest first. Each question
/// is fully processed (embed, search, generate) before the next is
/// accepted; any backend failure propagates to the caller unchanged.
pub struct RagChat {
    retriever: DocumentRetriever,
    llm: Arc<dyn LlmClient>,
    history: Vec<ConversationTurn>,
    history_limit: Option<usize>,
}

impl RagChat {
    pub fn new(retriever: DocumentRetriever, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            retriever,
            llm,
            history: Vec::new(),
            history_limit: None,
        }
    }

    /// Cap the retained history at `max_turns` turns. When a new turn
    /// would exceed the cap, the oldest turns are dropped first. Without
    /// this the history grows for the life of the session.
    pub fn with_history_limit(mut self, max_turns: usize) -> Self {
        self.history_limit = Some(max_turns);
        self
    }

    /// The session's turn history, oldest first.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Answer one user question with retrieved context.
    ///
    /// The user turn is recorded before retrieval starts, so a failed
    /// question still appears in the history; the assistant turn is only
    /// recorded once generation succeeds.
    pub async fn respond(&mut self, user_query: &str) -> AppResult<String> {
        tracing::info!("Answering user question");

        self.history.push(ConversationTurn::user(user_query));

        let chunks = self
            .retriever
            .search_documents(user_query, DEFAULT_TOP_K, SearchMode::Hybrid)
            .await?;

        tracing::debug!(chunks = chunks.len(), "Context retrieved");

        let request =
            prompt::build_request(&chunks, &self.history)?.with_temperature(ANSWER_TEMPERATURE);

        let response = self.llm.complete(&request).await?;
        let answer = response.content;

        self.history.push(ConversationTurn::assistant(answer.clone()));
        self.enforce_history_limit();

        Ok(answer)
    }

    fn enforce_history_limit(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use qna_core::{AppError, AppResult};
    use qna_llm::{ChatRole, MockEmbeddingClient, MockLlmClient};
    use qna_search::backend::{SearchBackend, SearchRequest};
    use qna_search::MockSearchBackend;
    use serde_json::json;

    fn canned_records(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                json!({
                    "title": format!("policy-{}.pdf", i),
                    "chunk": format!("policy text {}", i),
                    "chunk_id": format!("c-{}", i),
                    "parent_id": "p-0",
                    "@search.score": 5.0 - i as f64,
                })
            })
            .collect()
    }

    fn session(reply: &str) -> (RagChat, Arc<MockLlmClient>) {
        let backend = Arc::new(MockSearchBackend::with_results(canned_records(5)));
        let embedder = Arc::new(MockEmbeddingClient::new(8));
        let retriever = DocumentRetriever::new(backend, embedder);
        let llm = Arc::new(MockLlmClient::with_reply(reply));
        (RagChat::new(retriever, llm.clone()), llm)
    }

    #[tokio::test]
    async fn test_single_turn_history() {
        let (mut chat, _llm) = session("Economy flights only.");

        let answer = chat.respond("What is the travel policy?").await.unwrap();
        assert_eq!(answer, "Economy flights only.");

        let history = chat.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "What is the travel policy?");
        assert_eq!(history[1].role, Role::Assistant);
        assert!(!history[1].content.is_empty());
    }

    #[tokio::test]
    async fn test_two_turns_stay_chronological() {
        let (mut chat, _llm) = session("answer");

        chat.respond("first question").await.unwrap();
        chat.respond("second question").await.unwrap();

        let roles: Vec<Role> = chat.history().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(chat.history()[2].content, "second question");
    }

    #[tokio::test]
    async fn test_history_threaded_into_generation() {
        let (mut chat, llm) = session("answer");

        chat.respond("first question").await.unwrap();
        chat.respond("second question").await.unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 2);

        // First call: system + current question.
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].role, ChatRole::System);

        // Second call: system + user, assistant, user.
        assert_eq!(requests[1].messages.len(), 4);
        assert_eq!(requests[1].messages[1].content, "first question");
        assert_eq!(requests[1].messages[2].role, ChatRole::Assistant);
        assert_eq!(requests[1].messages[3].content, "second question");
    }

    #[tokio::test]
    async fn test_context_capped_at_default_top_k() {
        // Backend returns 5 records; only 3 may reach the prompt.
        let (mut chat, llm) = session("answer");

        chat.respond("question").await.unwrap();

        let system = &llm.requests()[0].messages[0].content;
        assert!(system.contains("policy text 0"));
        assert!(system.contains("policy text 2"));
        assert!(!system.contains("policy text 3"));
    }

    #[tokio::test]
    async fn test_history_limit_drops_oldest() {
        let backend = Arc::new(MockSearchBackend::with_results(canned_records(1)));
        let embedder = Arc::new(MockEmbeddingClient::new(8));
        let retriever = DocumentRetriever::new(backend, embedder);
        let llm = Arc::new(MockLlmClient::with_reply("answer"));
        let mut chat = RagChat::new(retriever, llm).with_history_limit(2);

        chat.respond("first").await.unwrap();
        chat.respond("second").await.unwrap();

        let history = chat.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "second");
        assert_eq!(history[1].role, Role::Assistant);
    }

    /// Backend that fails every query.
    struct FailingBackend;

    #[async_trait::async_trait]
    impl SearchBackend for FailingBackend {
        async fn search(&self, _request: &SearchRequest) -> AppResult<Vec<serde_json::Value>> {
            Err(AppError::Search("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let retriever = DocumentRetriever::new(
            Arc::new(FailingBackend),
            Arc::new(MockEmbeddingClient::new(8)),
        );
        let mut chat = RagChat::new(retriever, Arc::new(MockLlmClient::default()));

        let result = chat.respond("question").await;
        assert!(matches!(result, Err(AppError::Search(_))));

        // The user turn was recorded before the failure; no assistant turn.
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.history()[0].role, Role::User);
    }
}
