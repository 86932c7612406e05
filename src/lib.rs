//! Tender Evaluation API
//!
//! A retrieval-augmented chat back-end for evaluating tender submissions:
//! - Context retrieval from an AWS Bedrock Knowledge Base
//! - Answer generation through Bedrock (batch and streaming)
//! - Source citations resolved to presigned S3 links
//! - Evaluation document management in S3

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::citation::CitationExtractor;
use domain::generation::GenerationParams;
use domain::orchestrator::ConversationOrchestrator;
use domain::prompt::PromptComposer;
use domain::storage::DocumentStore;
use infrastructure::generation::bedrock::{BedrockClient, BedrockGenerator};
use infrastructure::retrieval::bedrock_kb::{
    BedrockKnowledgeBaseConfig, BedrockKnowledgeBaseRetriever,
};
use infrastructure::storage::s3::S3DocumentStore;

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.retrieval.knowledge_base_id.is_empty() {
        anyhow::bail!("retrieval.knowledge_base_id must be configured");
    }

    if config.storage.bucket.is_empty() {
        anyhow::bail!("storage.bucket must be configured");
    }

    let aws_config = if let Some(region) = &config.retrieval.region {
        aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await
    } else {
        aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await
    };

    let document_store = Arc::new(S3DocumentStore::new(&config.storage.bucket, &aws_config));

    // Evaluation criteria are loaded once; the prompt never varies afterwards
    info!(key = %config.storage.criteria_key, "loading evaluation criteria");
    let criteria_bytes = document_store.get(&config.storage.criteria_key).await?;
    let criteria = String::from_utf8(criteria_bytes.to_vec())
        .map_err(|e| anyhow::anyhow!("criteria file is not valid UTF-8: {}", e))?;

    let retriever = Arc::new(BedrockKnowledgeBaseRetriever::new(
        BedrockKnowledgeBaseConfig {
            knowledge_base_id: config.retrieval.knowledge_base_id.clone(),
            top_k: config.retrieval.top_k,
        },
        &aws_config,
    ));

    let params = GenerationParams {
        model_id: config.generation.model_id.clone(),
        max_tokens: config.generation.max_tokens,
        temperature: config.generation.temperature,
        top_p: config.generation.top_p,
        top_k: config.generation.top_k,
        stop_sequences: config.generation.stop_sequences.clone(),
    };
    let generator = Arc::new(BedrockGenerator::new(
        BedrockClient::new(&aws_config),
        params,
    ));

    let citations = CitationExtractor::new(
        document_store.clone(),
        Duration::from_secs(config.storage.presign_ttl_secs),
    );

    let orchestrator = ConversationOrchestrator::new(
        retriever,
        PromptComposer::new(criteria),
        generator,
        citations,
    );

    Ok(AppState::new(
        Arc::new(orchestrator),
        document_store,
        config.storage.documents_prefix.clone(),
    ))
}
