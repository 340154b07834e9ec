//! Infrastructure services

mod classification_service;
mod orchestrator_service;
mod semantic_cache_service;

pub use classification_service::{ClassificationService, ClassifierStats};
pub use orchestrator_service::{CACHED_STRATEGY, Orchestrator, OrchestratorDeps};
pub use semantic_cache_service::SemanticCacheService;
