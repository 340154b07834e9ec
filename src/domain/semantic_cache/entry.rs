//! Cache entries and lookup results

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::retrieval::DocumentRef;
use crate::domain::routing::ComplexityTier;

/// Everything the orchestrator hands over when storing an answer
#[derive(Debug, Clone)]
pub struct CacheWrite {
    pub query: String,
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    pub confidence: f64,
    pub cost: f64,
    pub strategy_name: String,
    pub complexity_tier: ComplexityTier,
    /// Overrides the configured TTL when set
    pub ttl_secs: Option<u64>,
}

/// A stored answer keyed by its original query text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    query: String,
    embedding: Vec<f32>,
    answer: String,
    documents: Vec<DocumentRef>,
    confidence: f64,
    cost: f64,
    strategy_name: String,
    complexity_tier: ComplexityTier,
    created_at: DateTime<Utc>,
    ttl_secs: u64,
    hit_count: u64,
}

impl CacheEntry {
    pub fn new(write: CacheWrite, embedding: Vec<f32>, ttl_secs: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            query: write.query,
            embedding,
            answer: write.answer,
            documents: write.documents,
            confidence: write.confidence,
            cost: write.cost,
            strategy_name: write.strategy_name,
            complexity_tier: write.complexity_tier,
            created_at,
            ttl_secs,
            hit_count: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn complexity_tier(&self) -> ComplexityTier {
        self.complexity_tier
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Instant at which the entry stops being served
    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        self.created_at
            .checked_add_signed(Duration::seconds(ttl.min(i64::MAX / 1000)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Expired once the age reaches the TTL
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    pub fn increment_hits(&mut self) {
        self.hit_count += 1;
    }
}

/// A served cache hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedResult {
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    pub confidence: f64,
    pub similarity: f32,
    pub original_query: String,
    pub strategy_name: String,
    pub complexity_tier: ComplexityTier,
    pub hit_count: u64,
    pub cost: f64,
    pub latency_ms: f64,
}
