//! Question answering endpoint

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::chat::Message;
use crate::domain::orchestrator::TurnOutcome;

/// Request body for POST /ask
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Prior conversation, oldest first; the question itself is not included
    #[serde(default)]
    pub history: Vec<Message>,
}

/// One context passage echoed back with the answer
#[derive(Debug, Serialize)]
pub struct ContextPassage {
    pub page_content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Response body for POST /ask
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
    pub context: Vec<ContextPassage>,
}

impl From<TurnOutcome> for AskResponse {
    fn from(outcome: TurnOutcome) -> Self {
        let context = outcome
            .citations
            .into_iter()
            .map(|citation| ContextPassage {
                page_content: citation.page_content,
                metadata: citation.metadata,
                link: citation.link,
            })
            .collect();

        Self {
            response: outcome.response,
            context,
        }
    }
}

/// Answer a question against the knowledge base
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    if request.question.trim().is_empty() {
        return Err(ApiError::bad_request("question must not be empty"));
    }

    info!(
        %request_id,
        history_len = request.history.len(),
        "processing question"
    );

    let outcome = state
        .orchestrator
        .answer(&request.question, &request.history)
        .await
        .map_err(|e| {
            error!(%request_id, error = %e, "turn failed");
            ApiError::from(e)
        })?;

    info!(
        %request_id,
        passages = outcome.passages.len(),
        "question answered"
    );

    Ok(Json(outcome.into()))
}
