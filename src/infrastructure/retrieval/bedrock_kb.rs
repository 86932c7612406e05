//! AWS Bedrock Knowledge Base retriever implementation

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client as BedrockAgentClient;
use aws_smithy_types::Document as SmithyDocument;

use crate::domain::error::DomainError;
use crate::domain::retrieval::{METADATA_LOCATION, METADATA_SCORE, RetrievedPassage, Retriever};

/// Configuration for the Bedrock Knowledge Base retriever
#[derive(Debug, Clone)]
pub struct BedrockKnowledgeBaseConfig {
    /// Knowledge Base ID (from the Bedrock console)
    pub knowledge_base_id: String,
    /// Maximum number of passages per query
    pub top_k: u32,
}

/// Retriever over a managed AWS Bedrock Knowledge Base
pub struct BedrockKnowledgeBaseRetriever {
    config: BedrockKnowledgeBaseConfig,
    client: BedrockAgentClient,
}

impl Debug for BedrockKnowledgeBaseRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockKnowledgeBaseRetriever")
            .field("config", &self.config)
            .finish()
    }
}

impl BedrockKnowledgeBaseRetriever {
    pub fn new(config: BedrockKnowledgeBaseConfig, aws_config: &aws_config::SdkConfig) -> Self {
        let client = BedrockAgentClient::new(aws_config);
        Self { config, client }
    }
}

#[async_trait]
impl Retriever for BedrockKnowledgeBaseRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>, DomainError> {
        use aws_sdk_bedrockagentruntime::types::{
            KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration,
            KnowledgeBaseVectorSearchConfiguration,
        };

        let vector_config = KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(self.config.top_k as i32)
            .build();

        let retrieval_config = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_config)
            .build();

        let kb_query = KnowledgeBaseQuery::builder()
            .text(query)
            .build();

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(&self.config.knowledge_base_id)
            .retrieval_query(kb_query)
            .retrieval_configuration(retrieval_config)
            .send()
            .await
            .map_err(|e| {
                DomainError::retrieval(format!("Knowledge base retrieve failed: {}", e))
            })?;

        let mut passages = Vec::new();

        for r in response.retrieval_results() {
            let text = match r.content() {
                Some(c) => c.text().to_string(),
                None => continue,
            };

            let mut metadata: HashMap<String, serde_json::Value> = HashMap::new();

            if let Some(md) = r.metadata() {
                for (key, doc) in md {
                    if let Some(val) = doc_to_json(doc) {
                        metadata.insert(key.clone(), val);
                    }
                }
            }

            if let Some(uri) = r
                .location()
                .and_then(|l| l.s3_location())
                .and_then(|s3| s3.uri())
            {
                metadata.insert(
                    METADATA_LOCATION.to_string(),
                    serde_json::Value::String(uri.to_string()),
                );
            }

            if let Some(score) = r.score() {
                metadata.insert(METADATA_SCORE.to_string(), serde_json::json!(score));
            }

            passages.push(RetrievedPassage { text, metadata });
        }

        Ok(passages)
    }
}

/// Convert AWS Smithy Document to serde_json::Value
fn doc_to_json(doc: &SmithyDocument) -> Option<serde_json::Value> {
    match doc {
        SmithyDocument::String(s) => Some(serde_json::Value::String(s.clone())),
        SmithyDocument::Number(n) => {
            let f = n.to_f64_lossy();
            Some(serde_json::json!(f))
        }
        SmithyDocument::Bool(b) => Some(serde_json::Value::Bool(*b)),
        SmithyDocument::Null => Some(serde_json::Value::Null),
        SmithyDocument::Array(arr) => {
            let values: Vec<serde_json::Value> = arr.iter().filter_map(doc_to_json).collect();
            Some(serde_json::Value::Array(values))
        }
        SmithyDocument::Object(obj) => {
            let mut map = serde_json::Map::new();

            for (k, v) in obj {
                if let Some(val) = doc_to_json(v) {
                    map.insert(k.clone(), val);
                }
            }

            Some(serde_json::Value::Object(map))
        }
    }
}
