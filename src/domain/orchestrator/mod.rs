//! Orchestration domain: configuration, scoring and result contract

mod confidence;
mod config;
mod pipeline;
mod result;

pub use confidence::{ConfidenceParams, ConfidenceScorer};
pub use config::{OrchestratorConfig, OrchestratorConfigOverrides};
pub use pipeline::{PipelineError, PipelineOutcome, RoutePlan};
pub use result::{FALLBACK_ANSWER, FALLBACK_STRATEGY, QueryResult};
