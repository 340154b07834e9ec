use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{
    MAX_BODY_SIZE, logging_middleware, metrics_middleware, security_headers_middleware,
};
use super::state::AppState;
use super::types::ApiError;
use super::{health, metrics, query};
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Routes under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::process_query))
        .route("/metrics", get(metrics::get_metrics))
        .route("/recent-queries", get(metrics::recent_queries))
        .route("/metrics/timeseries/queries", get(metrics::query_timeseries))
        .route("/health", get(health::detailed_health))
}

/// Build the full application router
pub fn create_router(state: AppState, prometheus: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/api", api_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = prometheus {
        router = router.merge(create_metrics_router(m));
    }

    router
}

async fn not_found() -> ApiError {
    ApiError::not_found("No route matches the request")
}
