//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ClassifierConfig, CorpusConfig, EmbeddingConfig, EmbeddingProviderKind,
    LogFormat, LoggingConfig, MetricsLogConfig, ServerConfig,
};
