//! Solve-cycle orchestration: validate, build, complete, present.

use crate::ai::{request, CompletionService, OpenAiCompletionClient};
use crate::config::Config;
use crate::input::{InputSelection, Mode, UploadedImage};
use crate::presenter::Outcome;
use crate::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct App {
    completion: Box<dyn CompletionService>,
    // Held for the whole cycle; solves never overlap.
    solving: Mutex<()>,
}

impl App {
    /// Build an app around any completion service, e.g. a mock in tests.
    pub fn with_service(completion: Box<dyn CompletionService>) -> Self {
        Self {
            completion,
            solving: Mutex::new(()),
        }
    }

    pub fn new(config: &Config) -> Self {
        info!("Completion model: {} ({})", config.model, config.base_url);
        let client = OpenAiCompletionClient::from_config(config, reqwest::Client::new());
        Self::with_service(Box::new(client))
    }

    /// Runs one solve cycle. Every failure ends in an [`Outcome`], never an error.
    pub async fn solve(&self, mode: Mode, text: &str, image: Option<UploadedImage>) -> Outcome {
        let _guard = self.solving.lock().await;

        let selection = match InputSelection::collect(mode, text, image) {
            Ok(selection) => selection,
            Err(warning) => {
                warn!("Rejected {:?} input: {}", mode, warning);
                return Outcome::Warning(warning);
            }
        };

        info!("Solving {:?} question", selection.mode());
        let chat_request = request::build(&selection);

        match self.completion.complete(&chat_request).await {
            Ok(answer) => {
                info!("Received answer ({} chars)", answer.len());
                Outcome::Answer(answer)
            }
            Err(Error::Completion(message)) => {
                error!("Completion failed: {}", message);
                Outcome::Failure(message)
            }
            Err(other) => {
                error!("Completion failed: {}", other);
                Outcome::Failure(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::MessageContent;
    use crate::ai::MockCompletionClient;
    use crate::error::ValidationError;
    use std::sync::Arc;
    use std::time::Duration;

    fn app_with(mock: &MockCompletionClient) -> App {
        App::with_service(Box::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_text_solve_returns_answer() {
        let mock = MockCompletionClient::new().with_response("4".to_string());
        let app = app_with(&mock);

        let outcome = app.solve(Mode::Text, "What is 2+2?", None).await;
        assert_eq!(outcome, Outcome::Answer("4".to_string()));

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages()[1].content,
            MessageContent::Text("What is 2+2?".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_question_short_circuits() {
        let mock = MockCompletionClient::new();
        let app = app_with(&mock);

        let outcome = app.solve(Mode::Text, "   ", None).await;
        assert_eq!(outcome, Outcome::Warning(ValidationError::EmptyQuestion));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_image_short_circuits() {
        let mock = MockCompletionClient::new();
        let app = app_with(&mock);

        let outcome = app.solve(Mode::Image, "typed text", None).await;
        assert_eq!(outcome, Outcome::Warning(ValidationError::MissingImage));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_completion_failure_becomes_outcome() {
        let mock = MockCompletionClient::new().with_failure("insufficient_quota".to_string());
        let app = app_with(&mock);

        let image = UploadedImage::new(vec![0x89, 0x50, 0x4E, 0x47], Some("q.png".to_string()));
        let outcome = app.solve(Mode::Image, "", Some(image)).await;
        assert_eq!(outcome, Outcome::Failure("insufficient_quota".to_string()));
        assert_eq!(mock.get_call_count(), 1);
    }

    struct SlowService {
        in_flight: Arc<std::sync::atomic::AtomicUsize>,
        max_seen: Arc<std::sync::atomic::AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl CompletionService for SlowService {
        async fn complete(&self, _request: &crate::ai::ChatRequest) -> crate::Result<String> {
            use std::sync::atomic::Ordering;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("done".to_string())
        }
    }

    #[tokio::test]
    async fn test_solves_never_overlap() {
        let max_seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let app = Arc::new(App::with_service(Box::new(SlowService {
            in_flight: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
            max_seen: max_seen.clone(),
        })));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move { app.solve(Mode::Text, &format!("q{}", i), None).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Outcome::Answer("done".to_string()));
        }
        assert_eq!(max_seen.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
