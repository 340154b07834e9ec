//! Retrieved documents and the references stored alongside answers

use serde::{Deserialize, Serialize};

/// Number of content characters kept in a document preview
pub const PREVIEW_CHARS: usize = 150;

/// A document returned by the retrieval backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub content: String,
    /// Similarity to the query, higher is better
    pub similarity_score: f32,
}

impl RetrievedDocument {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        similarity_score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            content: content.into(),
            similarity_score,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Convert to the compact reference returned to callers
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            similarity_score: self.similarity_score,
            content_preview: preview(&self.content, PREVIEW_CHARS),
        }
    }
}

/// Compact document reference kept on results and cache entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub similarity_score: f32,
    pub content_preview: String,
}

/// First `max_chars` characters followed by "..."
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut out: String = content.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let content = "é".repeat(200);
        let p = preview(&content, PREVIEW_CHARS);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_short_content() {
        assert_eq!(preview("short", 150), "short...");
    }

    #[test]
    fn test_to_ref() {
        let doc = RetrievedDocument::new("doc_001", "Refund Policy", "Refunds within 30 days", 0.72)
            .with_category("policy");
        let r = doc.to_ref();

        assert_eq!(r.id, "doc_001");
        assert_eq!(r.category.as_deref(), Some("policy"));
        assert_eq!(r.content_preview, "Refunds within 30 days...");
        assert!((r.similarity_score - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_ref_serialization_skips_missing_category() {
        let r = RetrievedDocument::new("d", "t", "c", 0.5).to_ref();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["content_preview"], "c...");
        assert!(json.get("similarity_score").is_some());
        assert!(json.get("category").is_none());
    }
}
