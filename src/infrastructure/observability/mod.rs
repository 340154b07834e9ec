//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_budget_downgrade,
    record_cache_event, record_http_request, record_query,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
