//! Health endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::retrieval::IndexHealth;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: String,
}

#[derive(Serialize)]
pub struct Components {
    pub cache: &'static str,
    pub router: &'static str,
    pub index: IndexHealth,
}

/// Component health with the current dashboard numbers
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub components: Components,
    pub metrics: super::metrics::MetricsResponse,
}

pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        service: "maestro",
        status: "operational",
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Returns 200 while the process is serving
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn detailed_health(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.index_health.clone();
    let status = if index.num_documents == 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: Components {
            cache: "operational",
            router: "operational",
            index,
        },
        metrics: super::metrics::collect(&state).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }
}
