//! Dashboard endpoints over the query metrics log

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::metrics::{DashboardMetrics, QueryMetric, TimeseriesBucket};
use crate::domain::semantic_cache::SemanticCacheStats;
use crate::infrastructure::services::ClassifierStats;

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 1000;

pub const DEFAULT_BUCKET_SECONDS: u32 = 60;
pub const MAX_BUCKET_SECONDS: u32 = 86_400;
pub const DEFAULT_NUM_BUCKETS: u32 = 20;
pub const MAX_NUM_BUCKETS: u32 = 1440;

/// Dashboard aggregates merged with cache statistics
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub dashboard: DashboardMetrics,
    #[serde(flatten)]
    pub cache: SemanticCacheStats,
    pub classifier: ClassifierStats,
}

#[derive(Debug, Deserialize)]
pub struct RecentQueriesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecentQueriesResponse {
    pub queries: Vec<QueryMetric>,
}

#[derive(Debug, Deserialize)]
pub struct TimeseriesParams {
    pub bucket_seconds: Option<u32>,
    pub num_buckets: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TimeseriesResponse {
    pub bucket_seconds: u32,
    pub data: Vec<TimeseriesBucket>,
}

pub(super) async fn collect(state: &AppState) -> MetricsResponse {
    MetricsResponse {
        dashboard: state.metrics_log.dashboard(),
        cache: state.cache.stats().await,
        classifier: state.classifier.stats().await,
    }
}

/// GET /api/metrics
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(collect(&state).await)
}

/// GET /api/recent-queries
pub async fn recent_queries(
    State(state): State<AppState>,
    Query(params): Query<RecentQueriesParams>,
) -> Result<Json<RecentQueriesResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    if limit == 0 || limit > MAX_RECENT_LIMIT {
        return Err(ApiError::bad_request(format!(
            "limit must be between 1 and {}",
            MAX_RECENT_LIMIT
        ))
        .with_param("limit"));
    }

    Ok(Json(RecentQueriesResponse {
        queries: state.metrics_log.recent(limit),
    }))
}

/// GET /api/metrics/timeseries/queries
pub async fn query_timeseries(
    State(state): State<AppState>,
    Query(params): Query<TimeseriesParams>,
) -> Result<Json<TimeseriesResponse>, ApiError> {
    let bucket_seconds = params.bucket_seconds.unwrap_or(DEFAULT_BUCKET_SECONDS);
    let num_buckets = params.num_buckets.unwrap_or(DEFAULT_NUM_BUCKETS);

    if bucket_seconds == 0 || bucket_seconds > MAX_BUCKET_SECONDS {
        return Err(ApiError::bad_request(format!(
            "bucket_seconds must be between 1 and {}",
            MAX_BUCKET_SECONDS
        ))
        .with_param("bucket_seconds"));
    }

    if num_buckets == 0 || num_buckets > MAX_NUM_BUCKETS {
        return Err(ApiError::bad_request(format!(
            "num_buckets must be between 1 and {}",
            MAX_NUM_BUCKETS
        ))
        .with_param("num_buckets"));
    }

    Ok(Json(TimeseriesResponse {
        bucket_seconds,
        data: state
            .metrics_log
            .timeseries(Utc::now(), bucket_seconds, num_buckets),
    }))
}
