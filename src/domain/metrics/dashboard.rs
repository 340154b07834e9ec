//! Dashboard aggregates over the metrics log

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{QueryMetric, QuerySource};

/// Aggregate figures shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_queries: u64,
    pub cache_hit_rate: f64,
    pub avg_cost: f64,
    pub avg_latency_ms: f64,
    pub total_cost: f64,
    /// Savings against always running the most expensive strategy
    pub cost_saved: f64,
    pub breakdown_by_strategy: BTreeMap<String, u64>,
}

/// Running totals so aggregates stay exact when old records are dropped
#[derive(Debug, Clone)]
pub struct DashboardAccumulator {
    naive_cost_per_query: f64,
    total_queries: u64,
    cache_queries: u64,
    total_cost: f64,
    total_latency_ms: f64,
    by_strategy: BTreeMap<String, u64>,
}

impl DashboardAccumulator {
    pub fn new(naive_cost_per_query: f64) -> Self {
        Self {
            naive_cost_per_query,
            total_queries: 0,
            cache_queries: 0,
            total_cost: 0.0,
            total_latency_ms: 0.0,
            by_strategy: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, metric: &QueryMetric) {
        self.total_queries += 1;
        if metric.source == QuerySource::Cache {
            self.cache_queries += 1;
        }
        self.total_cost += metric.cost;
        self.total_latency_ms += metric.latency_ms;
        *self.by_strategy.entry(metric.strategy.clone()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> DashboardMetrics {
        if self.total_queries == 0 {
            return DashboardMetrics::default();
        }

        let n = self.total_queries as f64;
        let baseline = n * self.naive_cost_per_query;

        DashboardMetrics {
            total_queries: self.total_queries,
            cache_hit_rate: self.cache_queries as f64 / n,
            avg_cost: self.total_cost / n,
            avg_latency_ms: self.total_latency_ms / n,
            total_cost: self.total_cost,
            cost_saved: (baseline - self.total_cost).max(0.0),
            breakdown_by_strategy: self.by_strategy.clone(),
        }
    }
}

/// Query counts for one time bucket, split by source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeseriesBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total: u64,
    pub cache: u64,
    pub retrieval: u64,
    pub fallback: u64,
}

/// Count metrics into `num_buckets` buckets of `bucket_seconds` ending at `now`, oldest first.
///
/// Records older than the window or later than `now` are ignored.
pub fn bucketize<'a>(
    metrics: impl IntoIterator<Item = &'a QueryMetric>,
    now: DateTime<Utc>,
    bucket_seconds: u32,
    num_buckets: u32,
) -> Vec<TimeseriesBucket> {
    if bucket_seconds == 0 || num_buckets == 0 {
        return Vec::new();
    }

    let width = Duration::seconds(i64::from(bucket_seconds));
    let window_start = now - width * num_buckets as i32;

    let mut buckets: Vec<TimeseriesBucket> = (0..num_buckets)
        .map(|i| {
            let start = window_start + width * i as i32;
            TimeseriesBucket {
                start,
                end: start + width,
                total: 0,
                cache: 0,
                retrieval: 0,
                fallback: 0,
            }
        })
        .collect();

    let width_ms = width.num_milliseconds();

    for metric in metrics {
        if metric.timestamp < window_start || metric.timestamp > now {
            continue;
        }

        let offset_ms = (metric.timestamp - window_start).num_milliseconds();
        // A record stamped exactly at `now` belongs to the last bucket.
        let index = ((offset_ms / width_ms) as usize).min(buckets.len() - 1);
        let bucket = &mut buckets[index];

        bucket.total += 1;
        match metric.source {
            QuerySource::Cache => bucket.cache += 1,
            QuerySource::Retrieval => bucket.retrieval += 1,
            QuerySource::Fallback => bucket.fallback += 1,
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(source: QuerySource, strategy: &str, cost: f64, at: DateTime<Utc>) -> QueryMetric {
        QueryMetric {
            timestamp: at,
            query: "q".to_string(),
            source,
            strategy: strategy.to_string(),
            latency_ms: 100.0,
            cost,
            confidence: 0.9,
            num_documents: 2,
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let acc = DashboardAccumulator::new(0.018);
        let snapshot = acc.snapshot();

        assert_eq!(snapshot.total_queries, 0);
        assert_eq!(snapshot.cache_hit_rate, 0.0);
        assert!(snapshot.breakdown_by_strategy.is_empty());
    }

    #[test]
    fn test_snapshot_aggregates() {
        let now = Utc::now();
        let mut acc = DashboardAccumulator::new(0.018);
        acc.record(&metric(QuerySource::Retrieval, "fast", 0.003, now));
        acc.record(&metric(QuerySource::Cache, "cached", 0.0001, now));
        acc.record(&metric(QuerySource::Retrieval, "fast", 0.003, now));
        acc.record(&metric(QuerySource::Fallback, "error_handling", 0.0, now));

        let snapshot = acc.snapshot();
        assert_eq!(snapshot.total_queries, 4);
        assert!((snapshot.cache_hit_rate - 0.25).abs() < 1e-9);
        assert!((snapshot.total_cost - 0.0061).abs() < 1e-9);
        assert!((snapshot.avg_latency_ms - 100.0).abs() < 1e-9);
        assert!((snapshot.cost_saved - (4.0 * 0.018 - 0.0061)).abs() < 1e-9);
        assert_eq!(snapshot.breakdown_by_strategy.get("fast"), Some(&2));
        assert_eq!(snapshot.breakdown_by_strategy.get("cached"), Some(&1));
    }

    #[test]
    fn test_cost_saved_never_negative() {
        let mut acc = DashboardAccumulator::new(0.001);
        acc.record(&metric(QuerySource::Retrieval, "comprehensive", 0.018, Utc::now()));

        assert_eq!(acc.snapshot().cost_saved, 0.0);
    }

    #[test]
    fn test_bucketize() {
        let now = Utc::now();
        let metrics = vec![
            metric(QuerySource::Retrieval, "fast", 0.003, now - Duration::seconds(130)),
            metric(QuerySource::Cache, "cached", 0.0001, now - Duration::seconds(30)),
            metric(QuerySource::Fallback, "error_handling", 0.0, now - Duration::seconds(10)),
            metric(QuerySource::Retrieval, "fast", 0.003, now),
            metric(QuerySource::Retrieval, "fast", 0.003, now - Duration::seconds(500)),
        ];

        let buckets = bucketize(&metrics, now, 60, 3);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].end, now);
        assert_eq!(buckets[0].start, now - Duration::seconds(180));

        assert_eq!(buckets[0].total, 1);
        assert_eq!(buckets[0].retrieval, 1);
        assert_eq!(buckets[1].total, 0);
        assert_eq!(buckets[2].total, 3);
        assert_eq!(buckets[2].cache, 1);
        assert_eq!(buckets[2].fallback, 1);
        assert_eq!(buckets[2].retrieval, 1);
    }

    #[test]
    fn test_bucketize_degenerate() {
        let none: Vec<QueryMetric> = Vec::new();
        assert!(bucketize(&none, Utc::now(), 0, 5).is_empty());
        assert!(bucketize(&none, Utc::now(), 60, 0).is_empty());
    }
}
