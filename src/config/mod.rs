mod app_config;

pub use app_config::{
    AppConfig, GenerationConfig, LogFormat, LoggingConfig, RetrievalConfig, ServerConfig,
    StorageConfig,
};
