//! Query metrics: the append-only log and its dashboard views

mod dashboard;
mod metric;

use chrono::{DateTime, Utc};

pub use dashboard::{DashboardAccumulator, DashboardMetrics, TimeseriesBucket, bucketize};
pub use metric::{MetricsSink, QueryMetric, QuerySource};

#[cfg(test)]
pub use metric::mock::RecordingMetricsSink;

/// A metrics sink that can also be read back for reporting
pub trait MetricsLog: MetricsSink {
    fn dashboard(&self) -> DashboardMetrics;

    /// Newest first
    fn recent(&self, limit: usize) -> Vec<QueryMetric>;

    fn timeseries(
        &self,
        now: DateTime<Utc>,
        bucket_seconds: u32,
        num_buckets: u32,
    ) -> Vec<TimeseriesBucket>;
}
