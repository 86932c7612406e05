//! AWS Bedrock answer generator implementation

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use serde::{Deserialize, Serialize};

use crate::domain::chat::{Message, MessageRole};
use crate::domain::error::DomainError;
use crate::domain::generation::{AnswerGenerator, FragmentStream, GenerationParams};

/// Stream of raw event payloads from the model endpoint
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, DomainError>> + Send>>;

/// AWS Bedrock runtime client trait for dependency injection
#[async_trait]
pub trait BedrockRuntimeClient: Send + Sync + std::fmt::Debug {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, DomainError>;

    async fn invoke_model_stream(
        &self,
        model_id: &str,
        body: Vec<u8>,
    ) -> Result<ChunkStream, DomainError>;
}

/// Answer generator backed by the Bedrock runtime
#[derive(Debug)]
pub struct BedrockGenerator<C: BedrockRuntimeClient> {
    client: C,
    params: GenerationParams,
}

impl<C: BedrockRuntimeClient> BedrockGenerator<C> {
    pub fn new(client: C, params: GenerationParams) -> Self {
        Self { client, params }
    }

    fn build_request(&self, messages: &[Message]) -> serde_json::Value {
        let (system, messages) = split_system_messages(messages);

        let anthropic_messages: Vec<AnthropicMessage> =
            messages.iter().map(|m| AnthropicMessage::from_domain(m)).collect();

        let mut body = serde_json::json!({
            "anthropic_version": "bedrock-2023-05-31",
            "messages": anthropic_messages,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "top_p": self.params.top_p,
            "top_k": self.params.top_k,
            "stop_sequences": self.params.stop_sequences,
        });

        if let Some(system_content) = system {
            body["system"] = serde_json::json!(system_content);
        }

        body
    }

    fn serialize_request(&self, messages: &[Message]) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(&self.build_request(messages)).map_err(|e| {
            DomainError::generation(format!("Failed to serialize request: {}", e))
        })
    }

    fn parse_response(&self, bytes: &[u8]) -> Result<String, DomainError> {
        let response: AnthropicResponse = serde_json::from_slice(bytes).map_err(|e| {
            DomainError::malformed_response(format!("Failed to parse response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(content)
    }
}

#[async_trait]
impl<C: BedrockRuntimeClient> AnswerGenerator for BedrockGenerator<C> {
    async fn generate(&self, messages: &[Message]) -> Result<String, DomainError> {
        let body = self.serialize_request(messages)?;
        let response_bytes = self.client.invoke_model(&self.params.model_id, body).await?;

        self.parse_response(&response_bytes)
    }

    async fn generate_stream(&self, messages: &[Message]) -> Result<FragmentStream, DomainError> {
        let body = self.serialize_request(messages)?;
        let chunks = self
            .client
            .invoke_model_stream(&self.params.model_id, body)
            .await?;

        // Non-text events (message_start, content_block_stop, ...) are dropped
        let fragments = chunks.filter_map(|chunk| async move {
            match chunk {
                Ok(bytes) => parse_stream_chunk(&bytes).transpose(),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(fragments))
    }
}

/// Extracts the text fragment from one streamed event payload, if it has one
fn parse_stream_chunk(bytes: &[u8]) -> Result<Option<String>, DomainError> {
    let event: AnthropicStreamEvent = serde_json::from_slice(bytes).map_err(|e| {
        DomainError::malformed_response(format!("Failed to parse stream chunk: {}", e))
    })?;

    if event.event_type != "content_block_delta" {
        return Ok(None);
    }

    let text = event
        .delta
        .filter(|d| d.delta_type == "text_delta")
        .and_then(|d| d.text);

    Ok(text)
}

fn split_system_messages(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let mut system_content = String::new();
    let mut other_messages = Vec::new();

    for msg in messages {
        if msg.role == MessageRole::System {
            if !system_content.is_empty() {
                system_content.push('\n');
            }

            system_content.push_str(&msg.content);
        } else {
            other_messages.push(msg);
        }
    }

    let system = if system_content.is_empty() {
        None
    } else {
        Some(system_content)
    };

    (system, other_messages)
}

// Anthropic messages API types

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

impl AnthropicMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "user",
        };

        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicStreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type")]
    delta_type: String,
    text: Option<String>,
}

/// Real AWS Bedrock runtime client
#[derive(Debug, Clone)]
pub struct BedrockClient {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        let client = aws_sdk_bedrockruntime::Client::new(config);
        Self { client }
    }
}

#[async_trait]
impl BedrockRuntimeClient for BedrockClient {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, DomainError> {
        let blob = aws_sdk_bedrockruntime::primitives::Blob::new(body);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .body(blob)
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("Bedrock API error: {}", e)))?;

        Ok(response.body.into_inner())
    }

    async fn invoke_model_stream(
        &self,
        model_id: &str,
        body: Vec<u8>,
    ) -> Result<ChunkStream, DomainError> {
        use aws_sdk_bedrockruntime::types::ResponseStream;

        let blob = aws_sdk_bedrockruntime::primitives::Blob::new(body);

        let response = self
            .client
            .invoke_model_with_response_stream()
            .model_id(model_id)
            .body(blob)
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("Bedrock API error: {}", e)))?;

        let chunks = stream::unfold(response.body, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(Some(ResponseStream::Chunk(part))) => {
                        if let Some(bytes) = part.bytes {
                            return Some((Ok(bytes.into_inner()), receiver));
                        }
                        // chunk without a payload, keep reading
                    }
                    Ok(Some(_)) => {
                        // unknown event variant, skip it
                    }
                    Ok(None) => return None,
                    Err(e) => {
                        return Some((
                            Err(DomainError::generation(format!(
                                "Bedrock stream error: {}",
                                e
                            ))),
                            receiver,
                        ));
                    }
                }
            }
        });

        Ok(Box::pin(chunks))
    }
}
