//! Prompt composition from retrieved passages, history and the question

use crate::domain::chat::Message;
use crate::domain::retrieval::RetrievedPassage;

const BASE_INSTRUCTION: &str =
    "You are a helpful assistant. Answer the question based only on the following context:\n";

/// Composes the per-turn message sequence sent to the generator.
///
/// Constructed once at startup with the evaluation-criteria block; the
/// criteria text never varies between turns.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    criteria: String,
}

impl PromptComposer {
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
        }
    }

    /// Builds: system message (instruction + passages + criteria), then the
    /// prior history verbatim, then the question as the final user message.
    ///
    /// Passages are joined in retrieval order with no dedup or re-ranking.
    pub fn compose(
        &self,
        question: &str,
        history: &[Message],
        passages: &[RetrievedPassage],
    ) -> Vec<Message> {
        let context = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let system = format!(
            "{BASE_INSTRUCTION}{context}\n'''\n{criteria}\n'''",
            criteria = self.criteria
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system));
        messages.extend_from_slice(history);
        messages.push(Message::user(question));
        messages
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::chat::MessageRole;

    use super::*;

    fn passages() -> Vec<RetrievedPassage> {
        vec![
            RetrievedPassage::new("Submissions close on 1 March."),
            RetrievedPassage::new("Late submissions are rejected."),
        ]
    }

    #[test]
    fn test_final_message_is_the_question() {
        let composer = PromptComposer::new("Score on price and quality.");
        let messages = composer.compose("When do submissions close?", &[], &passages());

        let last = messages.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "When do submissions close?");
    }

    #[test]
    fn test_system_message_contains_passages_and_criteria() {
        let composer = PromptComposer::new("Score on price and quality.");
        let messages = composer.compose("When do submissions close?", &[], &passages());

        let system = &messages[0];
        assert_eq!(system.role, MessageRole::System);
        assert!(
            system
                .content
                .contains("Submissions close on 1 March.\n\nLate submissions are rejected.")
        );
        assert!(system.content.contains("'''\nScore on price and quality.\n'''"));
    }

    #[test]
    fn test_history_is_preserved_in_order() {
        let composer = PromptComposer::new("criteria");
        let history = vec![
            Message::user("earlier question"),
            Message::assistant("earlier answer"),
        ];

        let messages = composer.compose("new question", &history, &[]);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], history[0]);
        assert_eq!(messages[2], history[1]);
        assert_eq!(messages[3], Message::user("new question"));
    }

    #[test]
    fn test_empty_passages_still_compose() {
        let composer = PromptComposer::new("criteria");
        let messages = composer.compose("question", &[], &[]);

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.starts_with(BASE_INSTRUCTION));
    }
}
