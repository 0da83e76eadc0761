//! Moka in-memory cache implementation
//!
//! Thread-safe in-process cache with a per-entry TTL. Used when no Redis
//! server is configured and in tests.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;
use moka::{
    Expiry,
    future::Cache,
    ops::compute::{CompResult, Op},
};
use tracing::{debug, instrument};

/// Maximum cache size in MB
const DEFAULT_MAX_CAPACITY_MB: u64 = 100;

/// Configuration for Moka cache
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Maximum capacity in megabytes
    pub max_capacity_mb: u64,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity_mb: DEFAULT_MAX_CAPACITY_MB,
        }
    }
}

/// Cached bytes together with the lifetime requested when they were written
#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    ttl: Duration,
}

/// Expires every entry after its own TTL, restarting it on overwrite
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-memory cache
///
/// Entries are weighed by their byte length, so the capacity bound is a
/// memory bound.
pub struct MokaCache {
    cache: Cache<String, Entry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaCache {
    /// Create a new Moka cache with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MokaCacheConfig::default())
    }

    /// Create a new Moka cache with custom configuration
    #[must_use]
    pub fn with_config(config: MokaCacheConfig) -> Self {
        let max_capacity_bytes = config.max_capacity_mb * 1024 * 1024;

        let cache = Cache::builder()
            .max_capacity(max_capacity_bytes)
            .expire_after(PerEntryTtl)
            .weigher(|key: &String, value: &Entry| -> u32 {
                (key.len() + value.bytes.len())
                    .try_into()
                    .unwrap_or(u32::MAX)
            })
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Number of live entries (after pending maintenance)
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        if let Some(entry) = self.cache.get(key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache hit");
            Ok(Some(entry.bytes))
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache miss");
            Ok(None)
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        self.cache
            .insert(key.to_string(), Entry { bytes: value, ttl })
            .await;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool, ApplicationError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError> {
        Ok(self.cache.contains_key(key))
    }

    #[instrument(skip(self), level = "debug")]
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, ApplicationError> {
        let outcome = self
            .cache
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) => Op::Put(Entry {
                        bytes: entry.into_value().bytes,
                        ttl,
                    }),
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(outcome, CompResult::ReplacedWith(_)))
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self) -> Result<(), ApplicationError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        debug!("Cache cleared");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use application::ports::CachePortExt;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        value: String,
        count: i32,
    }

    #[tokio::test]
    async fn set_and_get_value() {
        let cache = MokaCache::new();
        let data = TestData {
            value: "hello".to_string(),
            count: 42,
        };

        cache
            .set("test_key", &data, Duration::from_secs(60))
            .await
            .unwrap();

        let retrieved: Option<TestData> = cache.get("test_key").await.unwrap();
        assert_eq!(retrieved, Some(data));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let cache = MokaCache::new();
        let result: Option<TestData> = cache.get("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn entries_expire_after_their_own_ttl() {
        let cache = MokaCache::new();
        cache
            .set_bytes("short", b"a".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_bytes("long", b"b".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get_bytes("short").await.unwrap(), None);
        assert_eq!(cache.get_bytes("long").await.unwrap(), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn delete_reports_whether_entry_existed() {
        let cache = MokaCache::new();
        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.delete("key").await.unwrap());
        assert!(!cache.delete("key").await.unwrap());
        assert!(!cache.exists("key").await.unwrap());
    }

    #[tokio::test]
    async fn expire_extends_existing_entry() {
        let cache = MokaCache::new();
        cache
            .set_bytes("key", b"v".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();

        assert!(cache.expire("key", Duration::from_secs(60)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get_bytes("key").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn expire_missing_key_returns_false() {
        let cache = MokaCache::new();
        assert!(!cache.expire("missing", Duration::from_secs(60)).await.unwrap());
        assert!(!cache.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = MokaCache::new();
        for key in ["a", "b", "c"] {
            cache
                .set_bytes(key, b"1".to_vec(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        cache.clear().await.unwrap();

        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn stats_tracks_hits_and_misses() {
        let cache = MokaCache::new();
        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        // One hit
        let _: Option<String> = cache.get("key").await.unwrap();
        // Two misses
        let _: Option<String> = cache.get("missing1").await.unwrap();
        let _: Option<String> = cache.get("missing2").await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn memory_backend_is_always_connected() {
        let cache = MokaCache::default();
        assert!(cache.is_connected());
        assert_eq!(cache.backend_name(), "memory");
    }

    #[test]
    fn moka_cache_debug() {
        let debug = format!("{:?}", MokaCache::new());
        assert!(debug.contains("MokaCache"));
        assert!(debug.contains("entries"));
    }
}
