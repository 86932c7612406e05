//! Application state for shared services

use std::sync::Arc;

use crate::domain::orchestrator::ConversationOrchestrator;
use crate::domain::storage::DocumentStore;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub document_store: Arc<dyn DocumentStore>,
    /// Key prefix under which evaluation documents live
    pub documents_prefix: String,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        document_store: Arc<dyn DocumentStore>,
        documents_prefix: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            document_store,
            documents_prefix: documents_prefix.into(),
        }
    }
}
