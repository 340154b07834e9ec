//! In-memory query metrics log

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::domain::metrics::{
    DashboardAccumulator, DashboardMetrics, MetricsLog, MetricsSink, QueryMetric,
    TimeseriesBucket, bucketize,
};
use crate::infrastructure::observability::record_query;

#[derive(Debug)]
struct LogState {
    records: VecDeque<QueryMetric>,
    totals: DashboardAccumulator,
}

/// Append-only log with a bounded retained window.
///
/// Dashboard totals are running sums over every appended record, so they
/// stay exact after old records leave the window.
#[derive(Debug)]
pub struct InMemoryMetricsLog {
    state: RwLock<LogState>,
    max_records: usize,
}

impl InMemoryMetricsLog {
    /// `naive_cost_per_query` is the baseline used for `cost_saved`
    pub fn new(max_records: usize, naive_cost_per_query: f64) -> Self {
        Self {
            state: RwLock::new(LogState {
                records: VecDeque::new(),
                totals: DashboardAccumulator::new(naive_cost_per_query),
            }),
            max_records,
        }
    }

    /// Number of retained records
    pub fn retained(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }
}

impl MetricsSink for InMemoryMetricsLog {
    fn append(&self, metric: QueryMetric) {
        record_query(&metric);

        // Appending must not fail the caller; a poisoned lock still holds consistent data.
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state.totals.record(&metric);
        state.records.push_back(metric);

        while state.records.len() > self.max_records {
            state.records.pop_front();
        }
    }
}

impl MetricsLog for InMemoryMetricsLog {
    fn dashboard(&self) -> DashboardMetrics {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .totals
            .snapshot()
    }

    fn recent(&self, limit: usize) -> Vec<QueryMetric> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.records.iter().rev().take(limit).cloned().collect()
    }

    fn timeseries(
        &self,
        now: DateTime<Utc>,
        bucket_seconds: u32,
        num_buckets: u32,
    ) -> Vec<TimeseriesBucket> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        bucketize(&state.records, now, bucket_seconds, num_buckets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::metrics::QuerySource;

    fn metric(query: &str, source: QuerySource, at: DateTime<Utc>) -> QueryMetric {
        QueryMetric {
            timestamp: at,
            query: query.to_string(),
            source,
            strategy: "fast".to_string(),
            latency_ms: 10.0,
            cost: 0.003,
            confidence: 0.9,
            num_documents: 2,
        }
    }

    #[test]
    fn test_recent_is_newest_first() {
        let log = InMemoryMetricsLog::new(100, 0.018);
        let now = Utc::now();
        log.append(metric("one", QuerySource::Retrieval, now));
        log.append(metric("two", QuerySource::Retrieval, now));
        log.append(metric("three", QuerySource::Cache, now));

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "three");
        assert_eq!(recent[1].query, "two");
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn test_totals_survive_retention() {
        let log = InMemoryMetricsLog::new(2, 0.018);
        let now = Utc::now();
        for i in 0..5 {
            log.append(metric(&format!("q{}", i), QuerySource::Retrieval, now));
        }

        assert_eq!(log.retained(), 2);
        assert_eq!(log.dashboard().total_queries, 5);
        assert_eq!(log.recent(10)[0].query, "q4");
    }

    #[test]
    fn test_timeseries_uses_retained_records() {
        let log = InMemoryMetricsLog::new(100, 0.018);
        let now = Utc::now();
        log.append(metric("old", QuerySource::Retrieval, now - Duration::seconds(90)));
        log.append(metric("new", QuerySource::Cache, now - Duration::seconds(5)));

        let buckets = log.timeseries(now, 60, 2);
        assert_eq!(buckets[0].retrieval, 1);
        assert_eq!(buckets[1].cache, 1);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let log = Arc::new(InMemoryMetricsLog::new(10_000, 0.018));
        let now = Utc::now();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        log.append(metric(&format!("{}-{}", t, i), QuerySource::Retrieval, now));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.retained(), 800);
        assert_eq!(log.dashboard().total_queries, 800);
    }
}
