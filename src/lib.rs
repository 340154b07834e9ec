//! Maestro
//!
//! Query orchestration in front of a document retrieval backend:
//! - Semantic answer cache matched by embedding similarity
//! - Complexity classification and cost-aware strategy routing
//! - Confidence scoring, review flagging and a safe fallback path
//! - Query metrics with dashboard aggregates

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use config::{CorpusConfig, EmbeddingConfig, EmbeddingProviderKind};
use domain::embedding::EmbeddingProvider;
use domain::metrics::MetricsSink;
use domain::orchestrator::ConfidenceScorer;
use domain::routing::{ComplexityTier, StrategyRouter, StrategyTable};
use domain::{Clock, SystemClock};
use infrastructure::embedding::{HashingEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider};
use infrastructure::metrics::InMemoryMetricsLog;
use infrastructure::retrieval::{
    CorpusDocument, InMemoryDocumentIndex, TemplateAnswerSynthesizer, demo_corpus, load_corpus,
};
use infrastructure::semantic_cache::InMemorySemanticCacheStore;
use infrastructure::services::{
    ClassificationService, Orchestrator, OrchestratorDeps, SemanticCacheService,
};

/// Wire every service from configuration
pub async fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let embedder = create_embedding_provider(&config.embedding)?;

    let documents = load_documents(&config.corpus)?;
    let index = InMemoryDocumentIndex::build(documents, embedder.clone())
        .await
        .context("Failed to build document index")?;
    let index_health = index.health();

    let table = Arc::new(StrategyTable::standard());
    // Savings are measured against always running the most thorough strategy
    let naive_cost = table.for_tier(ComplexityTier::Complex).estimated_cost;
    let metrics_log = Arc::new(InMemoryMetricsLog::new(
        config.metrics_log.retention,
        naive_cost,
    ));

    let cache = Arc::new(SemanticCacheService::new(
        Arc::new(InMemorySemanticCacheStore::new(config.cache.max_entries)),
        embedder.clone(),
        clock.clone(),
        config.cache.clone(),
    ));
    let classifier = Arc::new(ClassificationService::new(config.classifier.memo_capacity));

    let metrics_sink: Arc<dyn MetricsSink> = metrics_log.clone();
    let orchestrator = Arc::new(Orchestrator::new(
        OrchestratorDeps {
            cache: cache.clone(),
            classifier: classifier.clone(),
            router: StrategyRouter::new(table),
            retriever: Arc::new(index),
            synthesizer: Arc::new(TemplateAnswerSynthesizer::new()),
            scorer: ConfidenceScorer::new(config.confidence.clone()),
            metrics: metrics_sink,
            clock,
        },
        config.orchestrator.clone(),
    ));

    info!(
        documents = index_health.num_documents,
        embedding_provider = index_health.embedding_provider,
        cache_max_entries = config.cache.max_entries,
        "Application state initialized"
    );

    Ok(AppState {
        orchestrator,
        cache,
        classifier,
        metrics_log,
        index_health,
    })
}

fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingProviderKind::Hashing => {
            Ok(Arc::new(HashingEmbeddingProvider::new(config.dimensions)?))
        }
        EmbeddingProviderKind::Openai => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                anyhow::anyhow!(
                    "{} environment variable is required for the openai embedding provider",
                    config.api_key_env
                )
            })?;

            let mut provider = OpenAiEmbeddingProvider::new(
                HttpClient::new(),
                api_key,
                &config.model,
                config.dimensions,
            );
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url);
            }

            Ok(Arc::new(provider))
        }
    }
}

fn load_documents(config: &CorpusConfig) -> anyhow::Result<Vec<CorpusDocument>> {
    let documents = match &config.path {
        Some(path) => {
            info!(path = %path, "Loading corpus");
            load_corpus(path)?
        }
        None => {
            info!("Loading built-in demo corpus");
            demo_corpus()?
        }
    };

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::QuerySource;
    use crate::domain::orchestrator::OrchestratorConfigOverrides;

    #[tokio::test]
    async fn test_build_app_state_with_defaults() {
        let state = build_app_state(&AppConfig::default()).await.unwrap();

        assert_eq!(state.index_health.num_documents, 10);
        assert_eq!(state.index_health.embedding_provider, "hashing");

        let result = state
            .orchestrator
            .process(
                "What is your refund policy?",
                &OrchestratorConfigOverrides::default(),
            )
            .await;

        assert_eq!(result.source, QuerySource::Retrieval);
        assert_eq!(result.strategy, "fast");
        assert_eq!(result.documents[0].id, "doc_001");
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);

        let cached = state
            .orchestrator
            .process(
                "What is your refund policy?",
                &OrchestratorConfigOverrides::default(),
            )
            .await;

        assert_eq!(cached.source, QuerySource::Cache);
        assert!((cached.cost - 0.0001).abs() < 1e-12);
        assert!(cached.latency_ms < result.latency_ms);
        assert_eq!(state.metrics_log.dashboard().total_queries, 2);
    }

    #[tokio::test]
    async fn test_missing_corpus_file_fails() {
        let mut config = AppConfig::default();
        config.corpus.path = Some("/nonexistent/documents.json".to_string());

        assert!(build_app_state(&config).await.is_err());
    }

    #[test]
    fn test_openai_provider_requires_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::Openai,
            api_key_env: "MAESTRO_TEST_UNSET_KEY".to_string(),
            ..EmbeddingConfig::default()
        };

        assert!(create_embedding_provider(&config).is_err());
    }
}
