//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::metrics::MetricsLog;
use crate::infrastructure::retrieval::IndexHealth;
use crate::infrastructure::services::{ClassificationService, Orchestrator, SemanticCacheService};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub cache: Arc<SemanticCacheService>,
    pub classifier: Arc<ClassificationService>,
    pub metrics_log: Arc<dyn MetricsLog>,
    /// The index is read-only once built, so its summary is captured at startup
    pub index_health: IndexHealth,
}
