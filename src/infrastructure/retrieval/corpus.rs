//! Document corpus loading

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const DEMO_CORPUS: &str = include_str!("../../../data/documents.json");

/// A document as stored in a corpus file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl CorpusDocument {
    /// Text used to embed the document for search
    pub fn index_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// Parse a JSON array of documents
pub fn parse_corpus(json: &str) -> Result<Vec<CorpusDocument>, DomainError> {
    let documents: Vec<CorpusDocument> = serde_json::from_str(json)
        .map_err(|e| DomainError::configuration(format!("Invalid corpus JSON: {}", e)))?;

    if let Some(doc) = documents.iter().find(|d| d.id.trim().is_empty()) {
        return Err(DomainError::validation(format!(
            "Corpus document '{}' has an empty id",
            doc.title
        )));
    }

    Ok(documents)
}

/// Built-in demo corpus
pub fn demo_corpus() -> Result<Vec<CorpusDocument>, DomainError> {
    parse_corpus(DEMO_CORPUS)
}

/// Load a corpus from a JSON file
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<CorpusDocument>, DomainError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!(
            "Failed to read corpus file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_corpus(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_corpus_loads() {
        let docs = demo_corpus().unwrap();

        assert_eq!(docs.len(), 10);
        assert_eq!(docs[0].id, "doc_001");
        assert_eq!(docs[0].title, "Refund Policy 2024");
        assert_eq!(docs[0].category.as_deref(), Some("policy"));
    }

    #[test]
    fn test_optional_fields_default() {
        let docs = parse_corpus(r#"[{"id": "a", "title": "T", "content": "C"}]"#).unwrap();

        assert_eq!(docs[0].category, None);
        assert_eq!(docs[0].last_updated, None);
        assert_eq!(docs[0].index_text(), "T\nC");
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let err = parse_corpus("{not json").unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = parse_corpus(r#"[{"id": " ", "title": "T", "content": "C"}]"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_corpus("/nonexistent/corpus.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/corpus.json"));
    }
}
