//! Semantic cache storage trait and types

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use super::CacheEntry;
use crate::domain::DomainError;

/// Outcome of a nearest-neighbour lookup
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// A live entry met the threshold; `entry` already carries the incremented hit count
    Hit { entry: CacheEntry, similarity: f32 },
    /// The best match met the threshold but had expired and was evicted
    Expired { query: String, similarity: f32 },
    /// Nothing met the threshold
    Miss { best_similarity: Option<f32> },
}

/// Statistics for the semantic cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    /// Current number of entries
    pub total_entries: usize,
    pub total_lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Average similarity of hits
    pub avg_hit_similarity: f64,
}

impl SemanticCacheStats {
    /// Ratio of hits to lookups, 0 when nothing has been looked up
    pub fn compute_hit_rate(hits: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }

        hits as f64 / total as f64
    }
}

/// Storage seam for cache entries.
///
/// Implementations own hit/miss accounting for lookups. A linear scan is the
/// reference; an ANN index may replace it as long as it keeps the same
/// hit/miss/TTL contract.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SemanticCacheStore: Send + Sync + Debug {
    /// Find the single most similar entry and resolve it against `threshold` and `now`
    async fn lookup(
        &self,
        embedding: &[f32],
        threshold: f32,
        now: DateTime<Utc>,
    ) -> Result<CacheLookup, DomainError>;

    /// Insert or overwrite by query text, evicting the oldest entry when full
    async fn insert(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Remove an entry by query text
    async fn remove(&self, query: &str) -> Result<bool, DomainError>;

    /// Record a miss that happened before reaching the store
    async fn record_miss(&self) -> Result<(), DomainError>;

    /// Remove every entry expired at `now`, returning how many were removed
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Drop all entries and reset statistics
    async fn clear(&self) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;
}
