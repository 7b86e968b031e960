//! Deterministic mock clients for tests and offline development.
//!
//! Both mocks record their invocations so callers can assert how often and
//! with what arguments the hosted backends would have been hit.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::embeddings::EmbeddingClient;
use qna_core::AppResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock embedding client producing deterministic content-dependent vectors.
///
/// Counts every `embed` call; the vector is seeded from the text bytes so
/// identical inputs embed identically.
#[derive(Debug)]
pub struct MockEmbeddingClient {
    dimensions: usize,
    calls: AtomicUsize,
}

impl MockEmbeddingClient {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut state = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            embedding.push(((state >> 40) as f32 / (1u64 << 24) as f32) - 0.5);
        }

        // Normalize to unit length
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }
}

/// Mock generation client returning a canned reply and capturing requests.
#[derive(Debug)]
pub struct MockLlmClient {
    reply: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests captured so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::with_reply("mock answer")
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());

        Ok(LlmResponse {
            content: self.reply.clone(),
            model: "mock".to_string(),
            usage: LlmUsage::new(0, 0),
        })
    }
}
