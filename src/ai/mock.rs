use super::types::ChatRequest;
use super::CompletionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted completion service for tests and local harnesses.
#[derive(Clone)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Makes every call fail with [`Error::Completion`] carrying `message`.
    pub fn with_failure(mut self, message: String) -> Self {
        self.failure = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(message) = &self.failure {
            return Err(Error::Completion(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("Mock answer".to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
