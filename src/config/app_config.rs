use serde::Deserialize;

use crate::domain::orchestrator::{ConfidenceParams, OrchestratorConfig};
use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub cache: SemanticCacheConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub confidence: ConfidenceParams,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub metrics_log: MetricsLogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Complexity classifier settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum number of memoized classifications
    #[serde(default = "default_memo_capacity")]
    pub memo_capacity: u64,
}

fn default_memo_capacity() -> u64 {
    10_000
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Hashing,
    Openai,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_dimensions() -> usize {
    384
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Document corpus served by the in-memory index
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorpusConfig {
    /// JSON file of documents; the built-in demo corpus is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Retention of the in-process metrics log
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsLogConfig {
    /// Records kept for recent-query and time-series views
    #[serde(default = "default_retention")]
    pub retention: usize,
}

fn default_retention() -> usize {
    100_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
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

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            memo_capacity: default_memo_capacity(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            dimensions: default_dimensions(),
            model: default_embedding_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for MetricsLogConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
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
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.classifier.memo_capacity, 10_000);
        assert!(config.corpus.path.is_none());
        assert_eq!(config.cache.max_entries, 1000);
        assert!(config.orchestrator.use_cache);
    }

    #[test]
    fn test_deserialize_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": {"host": "127.0.0.1", "port": 9000},
            "logging": {"level": "debug", "format": "json"},
            "orchestrator": {"max_cost_per_query": 0.01, "strategy_override": "fast"},
            "cache": {"ttl_secs": 60},
            "embedding": {"provider": "openai", "model": "text-embedding-3-large"}
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert!((config.orchestrator.max_cost_per_query - 0.01).abs() < 1e-9);
        assert_eq!(config.orchestrator.strategy_override.as_deref(), Some("fast"));
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Openai);
        assert_eq!(config.embedding.dimensions, 384);
    }
}
