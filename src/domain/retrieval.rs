//! Knowledge base retrieval trait and passage type

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Metadata key carrying the source document URI
pub const METADATA_LOCATION: &str = "location";

/// Metadata key carrying the relevance score
pub const METADATA_SCORE: &str = "score";

/// A passage returned by the knowledge base for a query
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedPassage {
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Source URI of the passage, when the knowledge base reported one
    pub fn location(&self) -> Option<&str> {
        self.metadata.get(METADATA_LOCATION).and_then(|v| v.as_str())
    }

    /// Relevance score, when the knowledge base reported one
    pub fn score(&self) -> Option<f64> {
        self.metadata.get(METADATA_SCORE).and_then(|v| v.as_f64())
    }
}

/// Retrieves passages relevant to a query from a knowledge base.
///
/// Implementations return at most the configured top-K passages, in
/// relevance order.
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>, DomainError>;
}
