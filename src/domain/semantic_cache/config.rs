//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the semantic answer cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Maximum number of entries to store
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Default time-to-live for entries in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Answers below this confidence are never cached
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Cost reported for a cache hit
    #[serde(default = "default_hit_cost")]
    pub hit_cost: f64,

    /// Latency reported by the cache for a hit
    #[serde(default = "default_hit_latency_ms")]
    pub hit_latency_ms: f64,

    /// Interval of the background expiry sweep, 0 disables it
    #[serde(default)]
    pub cleanup_interval_secs: u64,
}

fn default_max_entries() -> usize {
    1000
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_min_confidence() -> f64 {
    0.85
}

fn default_hit_cost() -> f64 {
    0.0001
}

fn default_hit_latency_ms() -> f64 {
    5.0
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
            min_confidence: default_min_confidence(),
            hit_cost: default_hit_cost(),
            hit_latency_ms: default_hit_latency_ms(),
            cleanup_interval_secs: 0,
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Get the sweep interval, if the sweeper is enabled
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_secs > 0).then(|| Duration::from_secs(self.cleanup_interval_secs))
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = interval.as_secs();
        self
    }
}
