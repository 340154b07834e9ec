//! Template-based answer synthesis

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::retrieval::{AnswerSynthesizer, RetrievedDocument};

const MAX_TITLES: usize = 3;
const SNIPPET_CHARS: usize = 200;

/// Builds an answer that cites the top document titles and quotes the
/// beginning of the best match. Stands in for an LLM call.
#[derive(Debug, Clone, Default)]
pub struct TemplateAnswerSynthesizer;

impl TemplateAnswerSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(documents: &[RetrievedDocument]) -> String {
        let titles: Vec<&str> = documents
            .iter()
            .take(MAX_TITLES)
            .map(|d| d.title.as_str())
            .collect();

        let mut answer = format!(
            "Based on {} relevant documents ({}), ",
            documents.len(),
            titles.join(", ")
        );

        if let Some(top) = documents.first() {
            answer.extend(top.content.chars().take(SNIPPET_CHARS));
            answer.push_str("...");
        }

        answer
    }
}

#[async_trait]
impl AnswerSynthesizer for TemplateAnswerSynthesizer {
    async fn synthesize(
        &self,
        _query: &str,
        documents: &[RetrievedDocument],
    ) -> Result<String, DomainError> {
        Ok(Self::render(documents))
    }
}
