//! Response Cache - short-lived in-memory store for upstream responses
//!
//! Entries expire per category:
//! - odds: 2 minutes
//! - stats: 10 minutes
//! - ai_parsing: 60 minutes
//!
//! Expired entries read as absent but are only replaced when the same key is
//! written again. There is no background sweep and no capacity bound.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

/// What kind of data an entry holds; decides its time-to-live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    Odds,
    Stats,
    AiParsing,
}

impl CacheCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheCategory::Odds => "odds",
            CacheCategory::Stats => "stats",
            CacheCategory::AiParsing => "ai_parsing",
        }
    }
}

/// Per-category time-to-live settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub odds: Duration,
    pub stats: Duration,
    pub ai_parsing: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            odds: Duration::from_secs(2 * 60),
            stats: Duration::from_secs(10 * 60),
            ai_parsing: Duration::from_secs(60 * 60),
        }
    }
}

impl CacheTtls {
    pub fn for_category(&self, category: CacheCategory) -> Duration {
        match category {
            CacheCategory::Odds => self.odds,
            CacheCategory::Stats => self.stats,
            CacheCategory::AiParsing => self.ai_parsing,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    timestamp: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.timestamp) < self.ttl
    }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Shared TTL cache. Share one instance behind an `Arc`.
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttls: CacheTtls,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

impl ResponseCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttls,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a value if it was set and has not expired
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit: {}", key);
                Some(entry.data.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value, replacing any previous entry for the key
    pub fn set(&self, key: &str, value: Value, category: CacheCategory) {
        let entry = CacheEntry {
            data: value,
            timestamp: Instant::now(),
            ttl: self.ttls.for_category(category),
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), entry);
    }

    /// Get a value and decode it. A value that no longer decodes reads as absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Cached value for {} has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Encode and store a value
    pub fn set_from<T: Serialize>(&self, key: &str, value: &T, category: CacheCategory) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.set(key, encoded, category),
            Err(e) => warn!("Failed to encode value for cache key {}: {}", key, e),
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache a successful result.
    ///
    /// Errors are returned as-is and never cached.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        category: CacheCategory,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get_as::<T>(key) {
            return Ok(cached);
        }

        let fresh = fetch().await?;
        self.set_from(key, &fresh, category);
        Ok(fresh)
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
