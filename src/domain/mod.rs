//! Domain layer - Core business logic and entities

pub mod clock;
pub mod embedding;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod retrieval;
pub mod routing;
pub mod semantic_cache;

pub use clock::{Clock, SystemClock};
pub use embedding::{EmbeddingProvider, cosine_similarity};
pub use error::DomainError;
pub use metrics::{DashboardMetrics, MetricsLog, MetricsSink, QueryMetric, QuerySource};
pub use orchestrator::{
    ConfidenceParams, ConfidenceScorer, OrchestratorConfig, OrchestratorConfigOverrides,
    QueryResult,
};
pub use retrieval::{AnswerSynthesizer, DocumentRef, DocumentRetriever, RetrievedDocument};
pub use routing::{ComplexityTier, RetrievalStrategy, StrategyRouter, StrategyTable};
pub use semantic_cache::{
    CacheEntry, CacheLookup, CacheWrite, CachedResult, SemanticCacheConfig, SemanticCacheStats,
    SemanticCacheStore,
};
