//! Orchestrator configuration and per-call overrides

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::DomainError;

/// Process-wide defaults for query processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_true")]
    pub use_cache: bool,

    #[serde(default = "default_cache_similarity_threshold")]
    pub cache_similarity_threshold: f32,

    /// Strategy name forced for every query, bypassing classification
    #[serde(default)]
    pub strategy_override: Option<String>,

    #[serde(default = "default_max_cost_per_query")]
    pub max_cost_per_query: f64,

    #[serde(default = "default_true")]
    pub enable_verification: bool,

    /// Upper bound on one call; exceeding it yields the fallback answer
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_cache_similarity_threshold() -> f32 {
    0.88
}

fn default_max_cost_per_query() -> f64 {
    0.05
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_similarity_threshold: default_cache_similarity_threshold(),
            strategy_override: None,
            max_cost_per_query: default_max_cost_per_query(),
            enable_verification: true,
            request_timeout_ms: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_strategy_override(mut self, strategy: impl Into<String>) -> Self {
        self.strategy_override = Some(strategy.into());
        self
    }

    pub fn with_max_cost_per_query(mut self, max_cost: f64) -> Self {
        self.max_cost_per_query = max_cost;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Merge per-call overrides field by field. Invalid fields are dropped with a warning.
    pub fn merged_with(&self, overrides: &OrchestratorConfigOverrides) -> Self {
        let mut merged = self.clone();

        if let Some(use_cache) = overrides.use_cache {
            merged.use_cache = use_cache;
        }

        if let Some(threshold) = overrides.cache_similarity_threshold {
            match validate_threshold(threshold) {
                Ok(()) => merged.cache_similarity_threshold = threshold,
                Err(e) => warn!(error = %e, "Ignoring cache_similarity_threshold override"),
            }
        }

        if let Some(strategy) = overrides.strategy_override.as_deref() {
            let strategy = strategy.trim();
            if !strategy.is_empty() {
                merged.strategy_override = Some(strategy.to_string());
            }
        }

        if let Some(max_cost) = overrides.max_cost_per_query {
            match validate_max_cost(max_cost) {
                Ok(()) => merged.max_cost_per_query = max_cost,
                Err(e) => warn!(error = %e, "Ignoring max_cost_per_query override"),
            }
        }

        if let Some(enable) = overrides.enable_verification {
            merged.enable_verification = enable;
        }

        if let Some(timeout_ms) = overrides.request_timeout_ms {
            match validate_timeout(timeout_ms) {
                Ok(()) => merged.request_timeout_ms = Some(timeout_ms),
                Err(e) => warn!(error = %e, "Ignoring request_timeout_ms override"),
            }
        }

        merged
    }
}

/// Partial configuration supplied with a single call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfigOverrides {
    #[serde(default)]
    pub use_cache: Option<bool>,
    #[serde(default)]
    pub cache_similarity_threshold: Option<f32>,
    #[serde(default, alias = "strategy")]
    pub strategy_override: Option<String>,
    #[serde(default)]
    pub max_cost_per_query: Option<f64>,
    #[serde(default)]
    pub enable_verification: Option<bool>,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl OrchestratorConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    pub fn with_cache_similarity_threshold(mut self, threshold: f32) -> Self {
        self.cache_similarity_threshold = Some(threshold);
        self
    }

    pub fn with_strategy_override(mut self, strategy: impl Into<String>) -> Self {
        self.strategy_override = Some(strategy.into());
        self
    }

    pub fn with_max_cost_per_query(mut self, max_cost: f64) -> Self {
        self.max_cost_per_query = Some(max_cost);
        self
    }

    pub fn with_enable_verification(mut self, enable: bool) -> Self {
        self.enable_verification = Some(enable);
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    /// Strict check used at the API boundary. Unknown strategy names are not
    /// an error; routing ignores them.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(threshold) = self.cache_similarity_threshold {
            validate_threshold(threshold)?;
        }
        if let Some(max_cost) = self.max_cost_per_query {
            validate_max_cost(max_cost)?;
        }
        if let Some(timeout_ms) = self.request_timeout_ms {
            validate_timeout(timeout_ms)?;
        }
        Ok(())
    }
}

fn validate_threshold(threshold: f32) -> Result<(), DomainError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::validation(format!(
            "cache_similarity_threshold must be between 0 and 1, got {}",
            threshold
        )));
    }
    Ok(())
}

fn validate_max_cost(max_cost: f64) -> Result<(), DomainError> {
    if !max_cost.is_finite() || max_cost < 0.0 {
        return Err(DomainError::validation(format!(
            "max_cost_per_query must be a non-negative number, got {}",
            max_cost
        )));
    }
    Ok(())
}

fn validate_timeout(timeout_ms: u64) -> Result<(), DomainError> {
    if timeout_ms == 0 {
        return Err(DomainError::validation("request_timeout_ms must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();

        assert!(config.use_cache);
        assert!((config.cache_similarity_threshold - 0.88).abs() < 1e-6);
        assert!(config.strategy_override.is_none());
        assert!((config.max_cost_per_query - 0.05).abs() < 1e-9);
        assert!(config.enable_verification);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_request_timeout_saturates() {
        let config = OrchestratorConfig::default().with_request_timeout(Duration::from_millis(1500));
        assert_eq!(config.request_timeout_ms, Some(1500));

        let config = OrchestratorConfig::default().with_request_timeout(Duration::MAX);
        assert_eq!(config.request_timeout_ms, Some(u64::MAX));
    }

    #[test]
    fn test_merge_applies_valid_fields() {
        let overrides = OrchestratorConfigOverrides::new()
            .with_use_cache(false)
            .with_strategy_override("comprehensive")
            .with_max_cost_per_query(0.01)
            .with_request_timeout_ms(250);

        let merged = OrchestratorConfig::default().merged_with(&overrides);

        assert!(!merged.use_cache);
        assert_eq!(merged.strategy_override.as_deref(), Some("comprehensive"));
        assert!((merged.max_cost_per_query - 0.01).abs() < 1e-9);
        assert_eq!(merged.request_timeout(), Some(Duration::from_millis(250)));
        assert!(merged.enable_verification);
    }

    #[test]
    fn test_merge_drops_invalid_fields() {
        let overrides = OrchestratorConfigOverrides::new()
            .with_cache_similarity_threshold(1.5)
            .with_max_cost_per_query(-1.0)
            .with_strategy_override("   ")
            .with_enable_verification(false);

        let base = OrchestratorConfig::default();
        let merged = base.merged_with(&overrides);

        assert_eq!(merged.cache_similarity_threshold, base.cache_similarity_threshold);
        assert_eq!(merged.max_cost_per_query, base.max_cost_per_query);
        assert!(merged.strategy_override.is_none());
        assert!(!merged.enable_verification);
    }

    #[test]
    fn test_validate() {
        assert!(OrchestratorConfigOverrides::new().validate().is_ok());
        assert!(
            OrchestratorConfigOverrides::new()
                .with_strategy_override("unknown")
                .validate()
                .is_ok()
        );
        assert!(
            OrchestratorConfigOverrides::new()
                .with_cache_similarity_threshold(-0.1)
                .validate()
                .is_err()
        );
        assert!(
            OrchestratorConfigOverrides::new()
                .with_max_cost_per_query(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            OrchestratorConfigOverrides::new()
                .with_request_timeout_ms(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_overrides_deserialize_partial() {
        let overrides: OrchestratorConfigOverrides =
            serde_json::from_str(r#"{"use_cache": false}"#).unwrap();

        assert_eq!(overrides.use_cache, Some(false));
        assert!(overrides.strategy_override.is_none());
    }
}
