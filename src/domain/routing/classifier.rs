//! Complexity classification
//!
//! The rule-based classifier is the deterministic baseline that is always
//! available. An [`ExternalClassifier`] (e.g. a hosted model) may front it.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::ComplexityTier;
use crate::domain::DomainError;

/// Keywords that mark comparative or analytical queries
pub const COMPLEX_KEYWORDS: &[&str] = &[
    "compare",
    "analyze",
    "evaluate",
    "assess",
    "versus",
    "vs",
    "difference between",
    "better than",
    "pros and cons",
];

/// Keywords that mark queries asking for an explanation
pub const MODERATE_KEYWORDS: &[&str] = &[
    "how do",
    "how can",
    "explain",
    "tell me about",
    "describe",
    "what features",
];

/// Prefixes of short factual questions
pub const SIMPLE_PREFIXES: &[&str] = &["what is", "what are", "who is", "when is"];

/// Queries with at most this many tokens are simple unless a keyword says otherwise
pub const SIMPLE_MAX_TOKENS: usize = 5;

/// Normalized form used as the memo key
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Higher-latency classifier that may be substituted as the primary path.
///
/// Returns a raw label; anything that does not parse as a tier is treated
/// as a failed classification.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExternalClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> Result<String, DomainError>;

    fn name(&self) -> &'static str;
}

/// Deterministic keyword and length heuristics
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Rules evaluated in fixed priority order
    pub fn classify(&self, query: &str) -> ComplexityTier {
        let query_lower = query.to_lowercase();

        if COMPLEX_KEYWORDS.iter().any(|k| query_lower.contains(k)) {
            return ComplexityTier::Complex;
        }

        if MODERATE_KEYWORDS.iter().any(|k| query_lower.contains(k)) {
            return ComplexityTier::Moderate;
        }

        if query_lower.split_whitespace().count() <= SIMPLE_MAX_TOKENS {
            return ComplexityTier::Simple;
        }

        let trimmed = query_lower.trim_start();
        if SIMPLE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return ComplexityTier::Simple;
        }

        ComplexityTier::Moderate
    }
}
