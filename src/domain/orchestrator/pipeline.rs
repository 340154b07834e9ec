//! Step results composed by the orchestrator

use thiserror::Error;

use crate::domain::DomainError;
use crate::domain::retrieval::RetrievedDocument;
use crate::domain::routing::{ComplexityTier, RetrievalStrategy};

/// Failures that route a call to the fallback answer
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Query embedding failed: {0}")]
    Embedding(#[source] DomainError),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[source] DomainError),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(#[source] DomainError),

    #[error("Query timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// Output of classification, selection and the budget check
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub complexity: ComplexityTier,
    pub strategy: RetrievalStrategy,
    pub downgraded: bool,
}

/// Output of retrieval and synthesis
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub documents: Vec<RetrievedDocument>,
    pub answer: String,
}

impl PipelineOutcome {
    /// Similarity scores in retrieval order
    pub fn scores(&self) -> Vec<f32> {
        self.documents.iter().map(|d| d.similarity_score).collect()
    }
}
