//! Memoized query complexity classification

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::routing::{
    ComplexityTier, ExternalClassifier, RuleBasedClassifier, normalize_query,
};

/// Counters for the classification memo
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifierStats {
    pub memo_entries: u64,
    pub memo_hits: u64,
    pub computations: u64,
    pub external_failures: u64,
}

/// Classifies queries into complexity tiers.
///
/// Results are memoized by normalized query text in a bounded cache.
/// Concurrent misses on the same key may compute twice; both produce the
/// same tier so the recompute is harmless.
pub struct ClassificationService {
    memo: Cache<String, ComplexityTier>,
    rules: RuleBasedClassifier,
    external: Option<Arc<dyn ExternalClassifier>>,
    memo_hits: AtomicU64,
    computations: AtomicU64,
    external_failures: AtomicU64,
}

impl fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationService")
            .field("memo_entries", &self.memo.entry_count())
            .field("external", &self.external.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl ClassificationService {
    pub fn new(memo_capacity: u64) -> Self {
        Self {
            memo: Cache::builder().max_capacity(memo_capacity).build(),
            rules: RuleBasedClassifier::new(),
            external: None,
            memo_hits: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            external_failures: AtomicU64::new(0),
        }
    }

    /// Use an external classifier as the primary path, with rules as fallback
    pub fn with_external(mut self, external: Arc<dyn ExternalClassifier>) -> Self {
        self.external = Some(external);
        self
    }

    /// Classify a query. Never fails.
    pub async fn classify(&self, query: &str) -> ComplexityTier {
        let key = normalize_query(query);

        if let Some(tier) = self.memo.get(&key).await {
            self.memo_hits.fetch_add(1, Ordering::Relaxed);
            return tier;
        }

        let tier = self.compute(&key).await;
        self.computations.fetch_add(1, Ordering::Relaxed);
        self.memo.insert(key, tier).await;

        tier
    }

    async fn compute(&self, normalized: &str) -> ComplexityTier {
        let Some(external) = &self.external else {
            return self.rules.classify(normalized);
        };

        let outcome = external
            .classify(normalized)
            .await
            .and_then(|label| ComplexityTier::from_str(label.trim()));

        match outcome {
            Ok(tier) => {
                debug!(classifier = external.name(), tier = %tier, "External classification");
                tier
            }
            Err(e) => {
                self.external_failures.fetch_add(1, Ordering::Relaxed);
                let tier = self.rules.classify(normalized);
                warn!(
                    classifier = external.name(),
                    error = %e,
                    fallback = %tier,
                    "External classifier failed, using rules"
                );
                tier
            }
        }
    }

    pub async fn stats(&self) -> ClassifierStats {
        self.memo.run_pending_tasks().await;

        ClassifierStats {
            memo_entries: self.memo.entry_count(),
            memo_hits: self.memo_hits.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            external_failures: self.external_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for ClassificationService {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::domain::routing::MockExternalClassifier;

    #[tokio::test]
    async fn test_rules_by_default() {
        let service = ClassificationService::default();

        assert_eq!(
            service.classify("Compare your pricing to competitors").await,
            ComplexityTier::Complex
        );
        assert_eq!(
            service.classify("How do I set up SSO for my team members?").await,
            ComplexityTier::Moderate
        );
        assert_eq!(
            service.classify("What is your refund policy?").await,
            ComplexityTier::Simple
        );
    }

    #[tokio::test]
    async fn test_memo_keyed_by_normalized_text() {
        let service = ClassificationService::default();

        let first = service.classify("What is your refund policy?").await;
        let second = service.classify("  WHAT IS YOUR REFUND POLICY?  ").await;

        assert_eq!(first, second);
        let stats = service.stats().await;
        assert_eq!(stats.computations, 1);
        assert_eq!(stats.memo_hits, 1);
        assert_eq!(stats.memo_entries, 1);
    }

    #[tokio::test]
    async fn test_external_label_used() {
        let mut external = MockExternalClassifier::new();
        external
            .expect_classify()
            .times(1)
            .returning(|_| Ok("Complex".to_string()));
        external.expect_name().return_const("mock");

        let service = ClassificationService::default().with_external(Arc::new(external));

        assert_eq!(service.classify("refund").await, ComplexityTier::Complex);
        assert_eq!(service.classify("refund").await, ComplexityTier::Complex);
    }

    #[tokio::test]
    async fn test_external_error_falls_back_to_rules() {
        let mut external = MockExternalClassifier::new();
        external
            .expect_classify()
            .times(1)
            .returning(|_| Err(DomainError::provider("llm", "unavailable")));
        external.expect_name().return_const("mock");

        let service = ClassificationService::default().with_external(Arc::new(external));

        let query = "Compare enterprise plans";
        assert_eq!(service.classify(query).await, ComplexityTier::Complex);
        // Fallback result is memoized, the external path is not retried
        assert_eq!(service.classify(query).await, ComplexityTier::Complex);
        assert_eq!(service.stats().await.external_failures, 1);
    }

    #[tokio::test]
    async fn test_unknown_label_falls_back_to_rules() {
        let mut external = MockExternalClassifier::new();
        external
            .expect_classify()
            .returning(|_| Ok("extreme".to_string()));
        external.expect_name().return_const("mock");

        let service = ClassificationService::default().with_external(Arc::new(external));

        assert_eq!(service.classify("refund policy").await, ComplexityTier::Simple);
    }

    #[tokio::test]
    async fn test_concurrent_classification_is_consistent() {
        let service = Arc::new(ClassificationService::default());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.classify("Analyze churn by region").await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), ComplexityTier::Complex);
        }

        let stats = service.stats().await;
        assert_eq!(stats.memo_hits + stats.computations, 16);
    }
}
