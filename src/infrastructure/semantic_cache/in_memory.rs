//! In-memory semantic cache store

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::DomainError;
use crate::domain::embedding::cosine_similarity;
use crate::domain::semantic_cache::{
    CacheEntry, CacheLookup, SemanticCacheStats, SemanticCacheStore,
};

#[derive(Debug, Default)]
struct CacheState {
    /// Keyed by the original query text
    entries: HashMap<String, CacheEntry>,
    hit_similarity_total: f64,
}

/// Linear-scan store. Similarity search runs under the read lock; hit
/// counting, expiry eviction and inserts take the write lock.
#[derive(Debug)]
pub struct InMemorySemanticCacheStore {
    state: RwLock<CacheState>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl InMemorySemanticCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, CacheState>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, CacheState>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))
    }

    /// Remove the entry with the oldest creation time
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        if let Some(oldest) = entries
            .values()
            .min_by_key(|entry| entry.created_at())
            .map(|entry| entry.query().to_string())
        {
            entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl SemanticCacheStore for InMemorySemanticCacheStore {
    async fn lookup(
        &self,
        embedding: &[f32],
        threshold: f32,
        now: DateTime<Utc>,
    ) -> Result<CacheLookup, DomainError> {
        let (key, created_at, similarity) = {
            let state = self.read_state()?;

            let mut best: Option<(&CacheEntry, f32)> = None;
            for entry in state.entries.values() {
                let similarity = cosine_similarity(embedding, entry.embedding());
                if best.is_none_or(|(_, current)| similarity > current) {
                    best = Some((entry, similarity));
                }
            }

            match best {
                Some((entry, similarity)) if similarity >= threshold => {
                    (entry.query().to_string(), entry.created_at(), similarity)
                }
                other => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return Ok(CacheLookup::Miss {
                        best_similarity: other.map(|(_, similarity)| similarity),
                    });
                }
            }
        };

        let mut guard = self.write_state()?;
        let state = &mut *guard;

        // The entry may have been replaced or removed between the two locks.
        let expired = state
            .entries
            .get(&key)
            .filter(|entry| entry.created_at() == created_at)
            .map(|entry| entry.is_expired_at(now));

        match expired {
            Some(true) => {
                state.entries.remove(&key);
                self.expirations.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(CacheLookup::Expired {
                    query: key,
                    similarity,
                })
            }
            Some(false) => match state.entries.get_mut(&key) {
                Some(entry) => {
                    entry.increment_hits();
                    let entry = entry.clone();
                    state.hit_similarity_total += f64::from(similarity);
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Ok(CacheLookup::Hit { entry, similarity })
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    Ok(CacheLookup::Miss {
                        best_similarity: Some(similarity),
                    })
                }
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(CacheLookup::Miss {
                    best_similarity: Some(similarity),
                })
            }
        }
    }

    async fn insert(&self, entry: CacheEntry) -> Result<(), DomainError> {
        if self.max_entries == 0 {
            return Ok(());
        }

        let mut state = self.write_state()?;

        if !state.entries.contains_key(entry.query()) && state.entries.len() >= self.max_entries {
            self.evict_oldest(&mut state.entries);
        }

        state.entries.insert(entry.query().to_string(), entry);

        Ok(())
    }

    async fn remove(&self, query: &str) -> Result<bool, DomainError> {
        let mut state = self.write_state()?;
        Ok(state.entries.remove(query).is_some())
    }

    async fn record_miss(&self) -> Result<(), DomainError> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut state = self.write_state()?;

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - state.entries.len();

        self.expirations.fetch_add(removed as u64, Ordering::Relaxed);

        Ok(removed)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut state = self.write_state()?;

        state.entries.clear();
        state.hit_similarity_total = 0.0;
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        let state = self.read_state()?;

        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total_lookups = hits + misses;
        let avg_hit_similarity = if hits == 0 {
            0.0
        } else {
            state.hit_similarity_total / hits as f64
        };

        Ok(SemanticCacheStats {
            total_entries: state.entries.len(),
            total_lookups,
            hits,
            misses,
            hit_rate: SemanticCacheStats::compute_hit_rate(hits, total_lookups),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            avg_hit_similarity,
        })
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read_state()?.entries.len())
    }
}
