use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Model and sampling settings, fixed for the lifetime of the process
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Bedrock Knowledge Base ID, required at startup
    pub knowledge_base_id: String,
    pub top_k: u32,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Evaluation document bucket, required at startup
    pub bucket: String,
    pub documents_prefix: String,
    pub criteria_key: String,
    pub presign_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            max_tokens: 2048,
            temperature: 0.9,
            top_p: 1.0,
            top_k: 250,
            stop_sequences: vec!["\n\nHuman".to_string()],
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            knowledge_base_id: String::new(),
            top_k: 4,
            region: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            documents_prefix: "eval-doc-files/".to_string(),
            criteria_key: "prompt-files/evaluation_criteria.txt".to_string(),
            presign_ttl_secs: 300,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_constants() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.model_id, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(config.generation.max_tokens, 2048);
        assert_eq!(config.generation.temperature, 0.9);
        assert_eq!(config.generation.top_k, 250);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.storage.presign_ttl_secs, 300);
        assert_eq!(config.storage.documents_prefix, "eval-doc-files/");
    }

    #[test]
    fn test_log_format_deserialization() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }

        let wrapper: Wrapper = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(wrapper.format, LogFormat::Json);
    }
}
