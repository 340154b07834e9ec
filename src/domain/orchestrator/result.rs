//! Result returned for every processed query

use serde::Serialize;

use crate::domain::metrics::QuerySource;
use crate::domain::retrieval::DocumentRef;
use crate::domain::routing::ComplexityTier;
use crate::domain::semantic_cache::CachedResult;

/// Strategy name reported for fallback answers
pub const FALLBACK_STRATEGY: &str = "error_handling";

/// Safe answer returned when the pipeline cannot produce one
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I'm experiencing technical difficulties. Please try again in a moment.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    pub confidence: f64,
    pub cost: f64,
    /// Wall-clock time of the whole call
    pub latency_ms: f64,
    pub source: QuerySource,
    pub strategy: String,
    /// Absent when the call failed before classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityTier>,
    pub needs_review: bool,
    pub num_documents_retrieved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<u64>,
    /// Latency figure reported by the cache itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_latency_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Build the result for a cache hit
    pub fn from_cache(cached: CachedResult, latency_ms: f64) -> Self {
        let num_documents = cached.documents.len();
        Self {
            answer: cached.answer,
            documents: cached.documents,
            confidence: cached.confidence,
            cost: cached.cost,
            latency_ms,
            source: QuerySource::Cache,
            strategy: cached.strategy_name,
            complexity: Some(cached.complexity_tier),
            needs_review: false,
            num_documents_retrieved: num_documents,
            cache_similarity: Some(cached.similarity),
            original_query: Some(cached.original_query),
            hit_count: Some(cached.hit_count),
            cache_latency_ms: Some(cached.latency_ms),
            error: None,
        }
    }

    /// Build the safe fallback result
    pub fn fallback(
        error: impl Into<String>,
        complexity: Option<ComplexityTier>,
        latency_ms: f64,
    ) -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            documents: Vec::new(),
            confidence: 0.0,
            cost: 0.0,
            latency_ms,
            source: QuerySource::Fallback,
            strategy: FALLBACK_STRATEGY.to_string(),
            complexity,
            needs_review: false,
            num_documents_retrieved: 0,
            cache_similarity: None,
            original_query: None,
            hit_count: None,
            cache_latency_ms: None,
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == QuerySource::Fallback
    }
}
