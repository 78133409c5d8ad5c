//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, DocumentsConfig, EmbeddingConfig, LlmConfig, LogFormat,
    LoggingConfig, ProviderKind, QueryConfig,
};
