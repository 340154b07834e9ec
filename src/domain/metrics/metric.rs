//! Per-query outcome records

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the answer of a query came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySource {
    Cache,
    Retrieval,
    Fallback,
}

impl QuerySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Retrieval => "retrieval",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record appended once per processed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetric {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub source: QuerySource,
    pub strategy: String,
    pub latency_ms: f64,
    pub cost: f64,
    pub confidence: f64,
    pub num_documents: usize,
}

/// Write-only destination for query metrics. Appending never fails to the caller.
pub trait MetricsSink: Send + Sync {
    fn append(&self, metric: QueryMetric);
}
