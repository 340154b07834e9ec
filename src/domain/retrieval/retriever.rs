//! Collaborator traits for search and answer synthesis

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::RetrievedDocument;
use crate::domain::DomainError;

/// Document search backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Return up to `top_k` documents, best match first
    async fn search(&self, query: &str, top_k: usize)
    -> Result<Vec<RetrievedDocument>, DomainError>;

    fn name(&self) -> &'static str;
}

/// Produces an answer text from a query and its supporting documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        query: &str,
        documents: &[RetrievedDocument],
    ) -> Result<String, DomainError>;
}
