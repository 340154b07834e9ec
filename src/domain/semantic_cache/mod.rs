//! Semantic cache domain models and traits
//!
//! Answers are matched by embedding similarity rather than exact query text.

mod config;
mod entry;
mod repository;

pub use config::SemanticCacheConfig;
pub use entry::{CacheEntry, CacheWrite, CachedResult};
pub use repository::{CacheLookup, SemanticCacheStats, SemanticCacheStore};

#[cfg(test)]
pub use repository::MockSemanticCacheStore;
