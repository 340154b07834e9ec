//! Observability configuration

use serde::Deserialize;

/// Main observability configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OpenTelemetry export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// Export spans over OTLP
    #[serde(default)]
    pub enabled: bool,
    /// OTLP endpoint (e.g., http://localhost:4317)
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Sampling ratio (0.0 to 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

/// Prometheus exporter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path the scrape endpoint is mounted on
    #[serde(default = "default_metrics_path")]
    pub path: String,
    /// Histogram buckets for `maestro_query_latency_ms`
    #[serde(default = "default_latency_buckets_ms")]
    pub latency_buckets_ms: Vec<f64>,
    /// Histogram buckets for `maestro_query_cost`, spanning a cache hit to the budget ceiling
    #[serde(default = "default_cost_buckets")]
    pub cost_buckets: Vec<f64>,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "maestro".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_latency_buckets_ms() -> Vec<f64> {
    vec![1.0, 5.0, 25.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
}

fn default_cost_buckets() -> Vec<f64> {
    vec![0.0001, 0.001, 0.003, 0.007, 0.018, 0.05]
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
            latency_buckets_ms: default_latency_buckets_ms(),
            cost_buckets: default_cost_buckets(),
        }
    }
}
