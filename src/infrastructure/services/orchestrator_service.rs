//! Query orchestration pipeline
//!
//! cache lookup -> classify -> select strategy -> budget check -> retrieve ->
//! synthesize -> score confidence -> conditional cache write -> metrics.
//! Any failure along the way produces the fallback answer instead of an error.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::{ClassificationService, SemanticCacheService};
use crate::domain::Clock;
use crate::domain::metrics::{MetricsSink, QueryMetric, QuerySource};
use crate::domain::orchestrator::{
    ConfidenceScorer, OrchestratorConfig, OrchestratorConfigOverrides, PipelineError,
    PipelineOutcome, QueryResult, RoutePlan,
};
use crate::domain::retrieval::{AnswerSynthesizer, DocumentRetriever, RetrievedDocument};
use crate::domain::routing::StrategyRouter;
use crate::domain::semantic_cache::CacheWrite;
use crate::infrastructure::observability::record_budget_downgrade;

/// Strategy label recorded in the metrics log for cache hits
pub const CACHED_STRATEGY: &str = "cached";

/// Collaborators of the orchestrator
pub struct OrchestratorDeps {
    pub cache: Arc<SemanticCacheService>,
    pub classifier: Arc<ClassificationService>,
    pub router: StrategyRouter,
    pub retriever: Arc<dyn DocumentRetriever>,
    pub synthesizer: Arc<dyn AnswerSynthesizer>,
    pub scorer: ConfidenceScorer,
    pub metrics: Arc<dyn MetricsSink>,
    pub clock: Arc<dyn Clock>,
}

pub struct Orchestrator {
    deps: OrchestratorDeps,
    config: OrchestratorConfig,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("retriever", &self.deps.retriever.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(deps: OrchestratorDeps, config: OrchestratorConfig) -> Self {
        Self { deps, config }
    }

    /// Default configuration that per-call overrides are merged into
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn router(&self) -> &StrategyRouter {
        &self.deps.router
    }

    /// Process a query end to end. Never fails; logs exactly one metric.
    #[instrument(skip(self, query, overrides), fields(query_len = query.len()))]
    pub async fn process(&self, query: &str, overrides: &OrchestratorConfigOverrides) -> QueryResult {
        let started = Instant::now();
        let config = self.config.merged_with(overrides);

        let mut result = match config.request_timeout() {
            Some(limit) => match tokio::time::timeout(limit, self.run(query, &config)).await {
                Ok(result) => result,
                Err(_) => {
                    let error = PipelineError::Timeout {
                        elapsed_ms: elapsed_ms(started) as u64,
                    };
                    warn!(error = %error, "Query processing timed out");
                    QueryResult::fallback(error.to_string(), None, 0.0)
                }
            },
            None => self.run(query, &config).await,
        };

        result.latency_ms = elapsed_ms(started);
        self.log_metric(query, &result);

        info!(
            source = %result.source,
            strategy = %result.strategy,
            confidence = result.confidence,
            cost = result.cost,
            latency_ms = result.latency_ms,
            "Query processed"
        );

        result
    }

    async fn run(&self, query: &str, config: &OrchestratorConfig) -> QueryResult {
        if config.use_cache {
            match self
                .deps
                .cache
                .get(query, config.cache_similarity_threshold)
                .await
            {
                Ok(Some(cached)) => return QueryResult::from_cache(cached, 0.0),
                Ok(None) => {}
                Err(e) => {
                    let error = PipelineError::Embedding(e);
                    warn!(error = %error, "Query embedding failed, returning fallback answer");
                    return QueryResult::fallback(error.to_string(), None, 0.0);
                }
            }
        }

        let plan = self.plan(query, config).await;

        let outcome = match self.execute(query, &plan).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    error = %e,
                    strategy = %plan.strategy.name,
                    "Pipeline failed, returning fallback answer"
                );
                return QueryResult::fallback(e.to_string(), Some(plan.complexity), 0.0);
            }
        };

        let confidence = self.deps.scorer.score(&outcome.scores());
        let needs_review =
            self.deps
                .scorer
                .needs_review(confidence, &plan.strategy, config.enable_verification);

        if needs_review {
            info!(
                confidence = confidence,
                strategy = %plan.strategy.name,
                "Answer flagged for review"
            );
        }

        let documents: Vec<_> = outcome.documents.iter().map(RetrievedDocument::to_ref).collect();

        if config.use_cache {
            self.deps
                .cache
                .set(CacheWrite {
                    query: query.to_string(),
                    answer: outcome.answer.clone(),
                    documents: documents.clone(),
                    confidence,
                    cost: plan.strategy.estimated_cost,
                    strategy_name: plan.strategy.name.clone(),
                    complexity_tier: plan.complexity,
                    ttl_secs: None,
                })
                .await;
        }

        QueryResult {
            answer: outcome.answer,
            num_documents_retrieved: documents.len(),
            documents,
            confidence,
            cost: plan.strategy.estimated_cost,
            latency_ms: 0.0,
            source: QuerySource::Retrieval,
            strategy: plan.strategy.name,
            complexity: Some(plan.complexity),
            needs_review,
            cache_similarity: None,
            original_query: None,
            hit_count: None,
            cache_latency_ms: None,
            error: None,
        }
    }

    /// Classify, select a strategy and enforce the cost ceiling
    async fn plan(&self, query: &str, config: &OrchestratorConfig) -> RoutePlan {
        let complexity = self.deps.classifier.classify(query).await;
        let selected = self
            .deps
            .router
            .select_strategy(complexity, config.strategy_override.as_deref());
        let selected_name = selected.name.clone();

        let decision = self
            .deps
            .router
            .apply_budget(selected, config.max_cost_per_query);

        if decision.downgraded {
            record_budget_downgrade(&selected_name, &decision.strategy.name);
        }

        debug!(
            complexity = %complexity,
            strategy = %decision.strategy.name,
            top_k = decision.strategy.top_k,
            downgraded = decision.downgraded,
            "Route planned"
        );

        RoutePlan {
            complexity,
            strategy: decision.strategy,
            downgraded: decision.downgraded,
        }
    }

    /// Retrieve and synthesize
    async fn execute(&self, query: &str, plan: &RoutePlan) -> Result<PipelineOutcome, PipelineError> {
        let documents = self
            .deps
            .retriever
            .search(query, plan.strategy.top_k)
            .await
            .map_err(PipelineError::Retrieval)?;

        let answer = self
            .deps
            .synthesizer
            .synthesize(query, &documents)
            .await
            .map_err(PipelineError::Synthesis)?;

        Ok(PipelineOutcome { documents, answer })
    }

    fn log_metric(&self, query: &str, result: &QueryResult) {
        let strategy = match result.source {
            QuerySource::Cache => CACHED_STRATEGY.to_string(),
            _ => result.strategy.clone(),
        };

        self.deps.metrics.append(QueryMetric {
            timestamp: self.deps.clock.now(),
            query: query.to_string(),
            source: result.source,
            strategy,
            latency_ms: result.latency_ms,
            cost: result.cost,
            confidence: result.confidence,
            num_documents: result.num_documents_retrieved,
        });
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
