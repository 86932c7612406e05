//! Per-turn conversation pipeline: retrieve, compose, generate, cite

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::chat::Message;
use crate::domain::citation::{Citation, CitationExtractor};
use crate::domain::error::DomainError;
use crate::domain::generation::{AnswerGenerator, FragmentStream};
use crate::domain::prompt::PromptComposer;
use crate::domain::retrieval::{RetrievedPassage, Retriever};

/// Result of one completed conversation turn
#[derive(Debug)]
pub struct TurnOutcome {
    pub response: String,
    pub passages: Vec<RetrievedPassage>,
    pub citations: Vec<Citation>,
}

/// Result of one streaming turn.
///
/// Retrieval finishes before generation starts, so passages and citations
/// are already materialized when the first fragment arrives. Callers render
/// the citations only after the fragment stream is exhausted.
pub struct StreamingAnswer {
    pub fragments: FragmentStream,
    pub passages: Vec<RetrievedPassage>,
    pub citations: Vec<Citation>,
}

/// Drives one question through the full answer pipeline.
///
/// The citations of a turn always correspond 1:1, in order, to the passages
/// from the same retrieval call that fed the prompt.
#[derive(Debug)]
pub struct ConversationOrchestrator {
    retriever: Arc<dyn Retriever>,
    composer: PromptComposer,
    generator: Arc<dyn AnswerGenerator>,
    citations: CitationExtractor,
}

impl ConversationOrchestrator {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        composer: PromptComposer,
        generator: Arc<dyn AnswerGenerator>,
        citations: CitationExtractor,
    ) -> Self {
        Self {
            retriever,
            composer,
            generator,
            citations,
        }
    }

    /// Answer a question in one call.
    ///
    /// Retrieval or generation failure aborts the turn; nothing is retried.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn answer(
        &self,
        question: &str,
        history: &[Message],
    ) -> Result<TurnOutcome, DomainError> {
        let passages = self.retriever.retrieve(question).await?;
        debug!(passage_count = passages.len(), "retrieved context passages");

        let messages = self.composer.compose(question, history, &passages);
        let response = self.generator.generate(&messages).await?;

        let citations = self.citations.extract(&passages).await;

        Ok(TurnOutcome {
            response,
            passages,
            citations,
        })
    }

    /// Answer a question as a fragment stream.
    ///
    /// The stream is finite and yields fragments in order; concatenated they
    /// form the same answer a batch call would return.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn answer_stream(
        &self,
        question: &str,
        history: &[Message],
    ) -> Result<StreamingAnswer, DomainError> {
        let passages = self.retriever.retrieve(question).await?;
        debug!(passage_count = passages.len(), "retrieved context passages");

        let messages = self.composer.compose(question, history, &passages);
        let fragments = self.generator.generate_stream(&messages).await?;

        let citations = self.citations.extract(&passages).await;

        Ok(StreamingAnswer {
            fragments,
            passages,
            citations,
        })
    }
}
