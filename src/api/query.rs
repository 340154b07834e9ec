//! Query processing endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use super::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::orchestrator::{OrchestratorConfigOverrides, QueryResult};

/// Longest accepted query, in characters
pub const MAX_QUERY_CHARS: u64 = 2000;

#[derive(Debug, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(min = 1, max = 2000))]
    pub query: String,

    /// Per-call overrides; `strategy` is accepted for `strategy_override`
    #[serde(flatten)]
    pub overrides: OrchestratorConfigOverrides,
}

/// POST /api/query
pub async fn process_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResult>, ApiError> {
    request.validate()?;

    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("query must not be blank").with_param("query"));
    }

    request.overrides.validate()?;
    debug!(overrides = ?request.overrides, "Processing query");

    let result = state.orchestrator.process(query, &request.overrides).await;

    Ok(Json(result))
}
