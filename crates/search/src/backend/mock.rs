//! Mock search backend replaying canned records.

use crate::backend::{SearchBackend, SearchRequest};
use qna_core::AppResult;
use std::sync::Mutex;

/// Mock backend returning a fixed record list and capturing every request
/// so tests can assert the shaped parameters.
#[derive(Debug, Default)]
pub struct MockSearchBackend {
    results: Vec<serde_json::Value>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MockSearchBackend {
    pub fn with_results(results: Vec<serde_json::Value>) -> Self {
        Self {
            results,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests captured so far, in call order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, request: &SearchRequest) -> AppResult<Vec<serde_json::Value>> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        Ok(self.results.clone())
    }
}
