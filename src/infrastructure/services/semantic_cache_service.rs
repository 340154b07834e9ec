//! Semantic answer cache service
//!
//! Wraps a [`SemanticCacheStore`] with query embedding, the confidence
//! write gate and TTL bookkeeping. Storage errors degrade to a miss or a
//! skipped write. A query that cannot be embedded is reported to the caller,
//! since the retrieval path depends on the same embedder.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::{Clock, DomainError};
use crate::domain::semantic_cache::{
    CacheEntry, CacheLookup, CacheWrite, CachedResult, SemanticCacheConfig, SemanticCacheStats,
    SemanticCacheStore,
};
use crate::infrastructure::observability::record_cache_event;

#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn SemanticCacheStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    clock: Arc<dyn Clock>,
    config: SemanticCacheConfig,
}

impl SemanticCacheService {
    pub fn new(
        store: Arc<dyn SemanticCacheStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        clock: Arc<dyn Clock>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Look up the closest cached answer with similarity >= `threshold`
    ///
    /// Fails only when the query cannot be embedded; the lookup still counts
    /// as a miss in the statistics.
    pub async fn get(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Option<CachedResult>, DomainError> {
        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Failed to embed query for cache lookup");
                record_cache_event("error");
                self.count_miss().await;
                return Err(e);
            }
        };

        let lookup = match self.store.lookup(&embedding, threshold, self.clock.now()).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                record_cache_event("error");
                self.count_miss().await;
                return Ok(None);
            }
        };

        match lookup {
            CacheLookup::Hit { entry, similarity } => {
                debug!(
                    similarity = similarity,
                    original_query = entry.query(),
                    hit_count = entry.hit_count(),
                    "Semantic cache hit"
                );
                record_cache_event("hit");
                Ok(Some(self.to_result(entry, similarity)))
            }
            CacheLookup::Expired { query, similarity } => {
                debug!(
                    similarity = similarity,
                    original_query = %query,
                    "Best cache match expired and was evicted"
                );
                record_cache_event("expired");
                Ok(None)
            }
            CacheLookup::Miss { best_similarity } => {
                debug!(best_similarity = ?best_similarity, "Semantic cache miss");
                record_cache_event("miss");
                Ok(None)
            }
        }
    }

    async fn count_miss(&self) {
        if let Err(e) = self.store.record_miss().await {
            warn!(error = %e, "Failed to record cache miss");
        }
    }

    /// Store an answer. Returns whether it was stored.
    pub async fn set(&self, write: CacheWrite) -> bool {
        if write.confidence < self.config.min_confidence {
            debug!(
                confidence = write.confidence,
                min_confidence = self.config.min_confidence,
                "Answer below cache confidence gate, not stored"
            );
            return false;
        }

        let embedding = match self.embedder.embed(&write.query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Failed to embed query for caching");
                record_cache_event("error");
                return false;
            }
        };

        let ttl_secs = write.ttl_secs.unwrap_or(self.config.ttl_secs);
        let entry = CacheEntry::new(write, embedding, ttl_secs, self.clock.now());
        let query = entry.query().to_string();

        match self.store.insert(entry).await {
            Ok(()) => {
                debug!(query = %query, ttl_secs = ttl_secs, "Cached answer");
                record_cache_event("store");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to store cache entry");
                record_cache_event("error");
                false
            }
        }
    }

    /// Drop all entries and reset statistics
    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear semantic cache");
        }
    }

    pub async fn stats(&self) -> SemanticCacheStats {
        self.store.stats().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read cache statistics");
            SemanticCacheStats::default()
        })
    }

    /// Remove expired entries now, returning how many were removed
    pub async fn cleanup_expired(&self) -> usize {
        match self.store.cleanup_expired(self.clock.now()).await {
            Ok(removed) => {
                if removed > 0 {
                    debug!(removed = removed, "Removed expired cache entries");
                }
                removed
            }
            Err(e) => {
                warn!(error = %e, "Cache cleanup failed");
                0
            }
        }
    }

    /// Start the periodic expiry sweep if an interval is configured
    pub fn spawn_cleanup_task(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let period = self.config.cleanup_interval()?;
        let service = Arc::clone(self);

        info!(interval_secs = period.as_secs(), "Starting cache cleanup task");

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                service.cleanup_expired().await;
            }
        }))
    }

    fn to_result(&self, entry: CacheEntry, similarity: f32) -> CachedResult {
        CachedResult {
            answer: entry.answer().to_string(),
            documents: entry.documents().to_vec(),
            confidence: entry.confidence(),
            similarity,
            original_query: entry.query().to_string(),
            strategy_name: entry.strategy_name().to_string(),
            complexity_tier: entry.complexity_tier(),
            hit_count: entry.hit_count(),
            cost: self.config.hit_cost,
            latency_ms: self.config.hit_latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::routing::ComplexityTier;
    use crate::domain::semantic_cache::MockSemanticCacheStore;
    use crate::infrastructure::semantic_cache::InMemorySemanticCacheStore;

    const REFUND: &str = "What is your refund policy?";
    const REFUND_REPHRASED: &str = "whats the refund policy";
    const SHIPPING: &str = "How long does shipping take?";

    fn embedder() -> MockEmbeddingProvider {
        MockEmbeddingProvider::new(3)
            .with_vector(REFUND, vec![1.0, 0.0, 0.0])
            .with_vector(REFUND_REPHRASED, vec![0.95, 0.3122, 0.0])
            .with_vector(SHIPPING, vec![0.0, 0.0, 1.0])
    }

    fn write(query: &str, confidence: f64) -> CacheWrite {
        CacheWrite {
            query: query.to_string(),
            answer: "Refunds within 30 days".to_string(),
            documents: vec![],
            confidence,
            cost: 0.003,
            strategy_name: "fast".to_string(),
            complexity_tier: ComplexityTier::Simple,
            ttl_secs: None,
        }
    }

    fn service(clock: Arc<ManualClock>, config: SemanticCacheConfig) -> SemanticCacheService {
        SemanticCacheService::new(
            Arc::new(InMemorySemanticCacheStore::new(config.max_entries)),
            Arc::new(embedder()),
            clock,
            config,
        )
    }

    #[tokio::test]
    async fn test_hit_returns_stored_payload() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock, SemanticCacheConfig::default());

        assert!(cache.set(write(REFUND, 0.9)).await);
        let hit = cache.get(REFUND_REPHRASED, 0.88).await.unwrap().unwrap();

        assert_eq!(hit.answer, "Refunds within 30 days");
        assert_eq!(hit.original_query, REFUND);
        assert_eq!(hit.strategy_name, "fast");
        assert_eq!(hit.complexity_tier, ComplexityTier::Simple);
        assert_eq!(hit.hit_count, 1);
        assert!((hit.cost - 0.0001).abs() < 1e-12);
        assert!((hit.latency_ms - 5.0).abs() < 1e-12);
        assert!(hit.similarity > 0.94);

        let again = cache.get(REFUND, 0.88).await.unwrap().unwrap();
        assert_eq!(again.hit_count, 2);
    }

    #[tokio::test]
    async fn test_below_confidence_gate_not_stored() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock, SemanticCacheConfig::default());

        assert!(!cache.set(write(REFUND, 0.849)).await);
        assert!(cache.get(REFUND, 0.88).await.unwrap().is_none());
        assert!(cache.set(write(REFUND, 0.85)).await);
        assert!(cache.get(REFUND, 0.88).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unrelated_query_misses() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock, SemanticCacheConfig::default());

        cache.set(write(REFUND, 0.95)).await;

        assert!(cache.get(SHIPPING, 0.88).await.unwrap().is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_ttl_boundary() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock.clone(), SemanticCacheConfig::default());

        cache.set(write(REFUND, 0.9)).await;

        clock.advance(Duration::seconds(3599));
        assert!(cache.get(REFUND, 0.88).await.unwrap().is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get(REFUND, 0.88).await.unwrap().is_none());
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_write_ttl_overrides_config() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock.clone(), SemanticCacheConfig::default());

        let mut short = write(REFUND, 0.9);
        short.ttl_secs = Some(10);
        cache.set(short).await;

        clock.advance(Duration::seconds(10));
        assert!(cache.get(REFUND, 0.88).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock.clone(), SemanticCacheConfig::default());

        cache.set(write(REFUND, 0.9)).await;
        cache.set(write(SHIPPING, 0.9)).await;
        clock.advance(Duration::hours(2));

        assert_eq!(cache.cleanup_expired().await, 2);
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_clear_resets_entries_and_stats() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = service(clock, SemanticCacheConfig::default());

        cache.set(write(REFUND, 0.9)).await;
        cache.get(REFUND, 0.88).await.unwrap();
        cache.clear().await;

        let stats = cache.stats().await;
        assert_eq!(stats, SemanticCacheStats::default());
    }

    #[tokio::test]
    async fn test_embedding_failure_is_reported_and_counted() {
        let store = Arc::new(InMemorySemanticCacheStore::new(10));
        let cache = SemanticCacheService::new(
            store.clone(),
            Arc::new(MockEmbeddingProvider::new(3).with_error("model offline")),
            Arc::new(ManualClock::starting_now()),
            SemanticCacheConfig::default(),
        );

        assert!(cache.get(REFUND, 0.88).await.is_err());
        assert!(!cache.set(write(REFUND, 0.99)).await);

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_lookups, 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_a_miss() {
        let mut store = MockSemanticCacheStore::new();
        store
            .expect_lookup()
            .returning(|_, _, _| Err(DomainError::cache("poisoned")));
        store.expect_record_miss().times(1).returning(|| Ok(()));
        store
            .expect_insert()
            .returning(|_| Err(DomainError::cache("poisoned")));
        store
            .expect_stats()
            .returning(|| Err(DomainError::cache("poisoned")));

        let cache = SemanticCacheService::new(
            Arc::new(store),
            Arc::new(embedder()),
            Arc::new(ManualClock::starting_now()),
            SemanticCacheConfig::default(),
        );

        assert!(cache.get(REFUND, 0.88).await.unwrap().is_none());
        assert!(!cache.set(write(REFUND, 0.99)).await);
        assert_eq!(cache.stats().await, SemanticCacheStats::default());
    }

    #[test]
    fn test_debug_output_names_the_store() {
        let cache = service(
            Arc::new(ManualClock::starting_now()),
            SemanticCacheConfig::default(),
        );

        let debug = format!("{:?}", cache);
        assert!(debug.contains("SemanticCacheService"));
        assert!(debug.contains("InMemorySemanticCacheStore"));
    }

    #[tokio::test]
    async fn test_cleanup_task_disabled_without_interval() {
        let cache = Arc::new(service(
            Arc::new(ManualClock::starting_now()),
            SemanticCacheConfig::default(),
        ));

        assert!(cache.spawn_cleanup_task().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_sweeps_periodically() {
        let clock = Arc::new(ManualClock::starting_now());
        let config =
            SemanticCacheConfig::default().with_cleanup_interval(std::time::Duration::from_secs(60));
        let cache = Arc::new(service(clock.clone(), config));

        cache.set(write(REFUND, 0.9)).await;
        clock.advance(Duration::hours(2));

        let handle = cache.spawn_cleanup_task().unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(61)).await;

        assert_eq!(cache.stats().await.total_entries, 0);
        handle.abort();
    }
}
