//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a given model version: the
/// semantic cache compares vectors produced minutes or hours apart.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Dimension of the produced vectors
    fn dimensions(&self) -> usize;
}
