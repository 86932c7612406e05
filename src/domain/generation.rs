//! Answer generation trait and fixed generation parameters

use std::fmt::Debug;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::chat::Message;
use crate::domain::error::DomainError;

/// Default model for answer generation
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Generation parameters, fixed per deployment rather than per request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: 2048,
            temperature: 0.9,
            top_p: 1.0,
            top_k: 250,
            stop_sequences: vec!["\n\nHuman".to_string()],
        }
    }
}

/// Ordered stream of answer text fragments.
///
/// Finite and non-restartable; fragments concatenate to the full answer.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Generates an answer from a composed message sequence
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    /// Generate the complete answer in one call
    async fn generate(&self, messages: &[Message]) -> Result<String, DomainError>;

    /// Generate the answer as a stream of text fragments
    async fn generate_stream(&self, messages: &[Message]) -> Result<FragmentStream, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use futures::stream;

    use super::*;

    /// Mock generator yielding a canned answer, fragments, or failure
    #[derive(Debug, Default)]
    pub struct MockAnswerGenerator {
        answer: String,
        fragments: Option<Vec<String>>,
        fail: bool,
    }

    impl MockAnswerGenerator {
        pub fn with_answer(answer: impl Into<String>) -> Self {
            Self {
                answer: answer.into(),
                fragments: None,
                fail: false,
            }
        }

        /// Streams the given fragments; batch calls return their concatenation
        pub fn with_fragments(fragments: Vec<&str>) -> Self {
            let fragments: Vec<String> = fragments.into_iter().map(String::from).collect();

            Self {
                answer: fragments.concat(),
                fragments: Some(fragments),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                answer: String::new(),
                fragments: None,
                fail: true,
            }
        }
    }

    #[async_trait]
    impl AnswerGenerator for MockAnswerGenerator {
        async fn generate(&self, _messages: &[Message]) -> Result<String, DomainError> {
            if self.fail {
                return Err(DomainError::generation("mock generation failure"));
            }

            Ok(self.answer.clone())
        }

        async fn generate_stream(
            &self,
            _messages: &[Message],
        ) -> Result<FragmentStream, DomainError> {
            if self.fail {
                return Err(DomainError::generation("mock generation failure"));
            }

            let fragments = self
                .fragments
                .clone()
                .unwrap_or_else(|| vec![self.answer.clone()]);

            Ok(Box::pin(stream::iter(fragments.into_iter().map(Ok))))
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();

        assert_eq!(params.model_id, DEFAULT_MODEL_ID);
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.temperature, 0.9);
        assert_eq!(params.top_p, 1.0);
        assert_eq!(params.top_k, 250);
        assert_eq!(params.stop_sequences, vec!["\n\nHuman".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_batch_generation() {
        let generator = mock::MockAnswerGenerator::with_answer("The deadline is Friday.");

        let answer = generator.generate(&[Message::user("deadline?")]).await.unwrap();
        assert_eq!(answer, "The deadline is Friday.");
    }

    #[tokio::test]
    async fn test_mock_fragments_reconstruct_answer() {
        let generator = mock::MockAnswerGenerator::with_fragments(vec!["Hel", "lo"]);

        let mut stream = generator
            .generate_stream(&[Message::user("greet me")])
            .await
            .unwrap();

        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            answer.push_str(&fragment.unwrap());
        }

        assert_eq!(answer, "Hello");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let generator = mock::MockAnswerGenerator::failing();

        let result = generator.generate(&[Message::user("deadline?")]).await;
        assert!(matches!(result, Err(DomainError::Generation { .. })));
    }
}
