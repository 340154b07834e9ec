//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::metrics::QueryMetric;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment regex"));

/// Handle used to render the scrape endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = match prometheus_builder(config) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!("Invalid Prometheus histogram buckets: {}", e);
            return None;
        }
    };

    match builder.install_recorder() {
        Ok(handle) => {
            gauge!("maestro_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Builder with the query histograms bucketed per configuration
fn prometheus_builder(config: &MetricsConfig) -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("maestro_query_latency_ms".to_string()),
            &config.latency_buckets_ms,
        )?
        .set_buckets_for_metric(
            Matcher::Full("maestro_query_cost".to_string()),
            &config.cost_buckets,
        )
}

/// Router exposing the scrape endpoint
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();
    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of one processed query
pub fn record_query(metric: &QueryMetric) {
    let labels = [
        ("source", metric.source.as_str().to_string()),
        ("strategy", metric.strategy.clone()),
    ];

    counter!("maestro_queries_total", &labels).increment(1);
    histogram!("maestro_query_latency_ms", &labels).record(metric.latency_ms);
    histogram!("maestro_query_cost", &labels).record(metric.cost);
    histogram!("maestro_query_confidence", &labels).record(metric.confidence);
}

/// Record a cache event such as `hit`, `miss`, `expired` or `eviction`
pub fn record_cache_event(event: &'static str) {
    counter!("maestro_cache_events_total", "event" => event).increment(1);
}

/// Record a budget downgrade from one strategy to another
pub fn record_budget_downgrade(from: &str, to: &str) {
    counter!(
        "maestro_budget_downgrades_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Replace ids in a path so labels stay low-cardinality
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let sanitized = sanitize_path("/api/queries/550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(sanitized, "/api/queries/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/items/123/detail"), "/api/items/{id}/detail");
    }

    #[test]
    fn test_sanitize_path_plain() {
        assert_eq!(sanitize_path("/api/metrics"), "/api/metrics");
    }

    #[test]
    fn test_builder_accepts_default_buckets() {
        assert!(prometheus_builder(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_builder_rejects_empty_buckets() {
        let config = MetricsConfig {
            cost_buckets: vec![],
            ..MetricsConfig::default()
        };
        assert!(prometheus_builder(&config).is_err());
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/api/metrics/timeseries/queries/with/a/very/long/suffix/for/labels";
        assert!(sanitize_path(path).len() <= 50);
    }
}
