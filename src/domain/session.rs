//! In-process chat session owning a single conversation

use futures::StreamExt;
use tracing::instrument;

use crate::domain::chat::Conversation;
use crate::domain::citation::Citation;
use crate::domain::error::DomainError;
use crate::domain::orchestrator::ConversationOrchestrator;

/// One interactive session: one conversation, one turn at a time.
///
/// The user message is recorded before dispatch; the assistant message is
/// recorded only when the turn succeeds, so a failed turn leaves the last
/// user message unanswered rather than half-answered.
#[derive(Debug)]
pub struct ChatSession<'a> {
    orchestrator: &'a ConversationOrchestrator,
    conversation: Conversation,
}

impl<'a> ChatSession<'a> {
    pub fn new(orchestrator: &'a ConversationOrchestrator) -> Self {
        Self {
            orchestrator,
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Submit a question and record the exchanged messages
    #[instrument(skip(self))]
    pub async fn submit(&mut self, question: &str) -> Result<Vec<Citation>, DomainError> {
        // history sent to the model excludes the question being asked
        let history = self.conversation.messages().to_vec();
        self.conversation.push_user(question);

        let outcome = self.orchestrator.answer(question, &history).await?;
        self.conversation.push_assistant(&outcome.response);

        Ok(outcome.citations)
    }

    /// Submit a question, draining the fragment stream into the history
    #[instrument(skip(self))]
    pub async fn submit_streaming(&mut self, question: &str) -> Result<Vec<Citation>, DomainError> {
        let history = self.conversation.messages().to_vec();
        self.conversation.push_user(question);

        let answer = self.orchestrator.answer_stream(question, &history).await?;

        let mut response = String::new();
        let mut fragments = answer.fragments;
        while let Some(fragment) = fragments.next().await {
            response.push_str(&fragment?);
        }

        self.conversation.push_assistant(response);
        Ok(answer.citations)
    }

    /// Drop the history and start over from the greeting
    pub fn clear(&mut self) {
        self.conversation.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::domain::chat::{GREETING, Message};
    use crate::domain::citation::CitationExtractor;
    use crate::domain::generation::mock::MockAnswerGenerator;
    use crate::domain::prompt::PromptComposer;
    use crate::domain::retrieval::mock::MockRetriever;
    use crate::domain::storage::{DEFAULT_PRESIGN_TTL, mock::InMemoryDocumentStore};

    use super::*;

    fn orchestrator(generator: MockAnswerGenerator) -> ConversationOrchestrator {
        ConversationOrchestrator::new(
            Arc::new(MockRetriever::with_passages(Vec::new())),
            PromptComposer::new("criteria"),
            Arc::new(generator),
            CitationExtractor::new(Arc::new(InMemoryDocumentStore::new()), DEFAULT_PRESIGN_TTL),
        )
    }

    #[tokio::test]
    async fn test_successful_turn_records_both_messages() {
        let orchestrator = orchestrator(MockAnswerGenerator::with_answer("Friday."));
        let mut session = ChatSession::new(&orchestrator);

        session.submit("When is the deadline?").await.unwrap();

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::assistant(GREETING));
        assert_eq!(messages[1], Message::user("When is the deadline?"));
        assert_eq!(messages[2], Message::assistant("Friday."));
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message_only() {
        let orchestrator = orchestrator(MockAnswerGenerator::failing());
        let mut session = ChatSession::new(&orchestrator);

        let result = session.submit("When is the deadline?").await;
        assert!(result.is_err());

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], Message::user("When is the deadline?"));
    }

    #[tokio::test]
    async fn test_streaming_turn_records_full_answer() {
        let orchestrator = orchestrator(MockAnswerGenerator::with_fragments(vec!["Fri", "day."]));
        let mut session = ChatSession::new(&orchestrator);

        session.submit_streaming("When is the deadline?").await.unwrap();

        let messages = session.conversation().messages();
        assert_eq!(messages[2], Message::assistant("Friday."));
    }

    #[tokio::test]
    async fn test_clear_resets_to_greeting() {
        let orchestrator = orchestrator(MockAnswerGenerator::with_answer("Friday."));
        let mut session = ChatSession::new(&orchestrator);

        session.submit("When is the deadline?").await.unwrap();
        session.clear();

        assert_eq!(
            session.conversation().messages(),
            &[Message::assistant(GREETING)]
        );
    }
}
