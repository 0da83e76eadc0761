//! Cache port definition
//!
//! Defines the key/value interface the processing pipeline caches results in.
//! Implementations may use a distributed cache (Redis) or an in-process
//! cache (Moka).

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Cache port for storing and retrieving cached values
///
/// Implementations should be thread-safe and every operation must be atomic
/// at the key level. Values are stored as raw bytes - callers handle
/// serialization. Errors are reported, never hidden: the degrade-to-miss
/// policy lives in [`crate::services::CacheStore`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CachePort: Send + Sync + std::fmt::Debug {
    /// Get a cached value by key
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError>;

    /// Set a cached value with a time-to-live
    ///
    /// If the key already exists, its value and TTL are replaced.
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError>;

    /// Delete a single entry, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, ApplicationError>;

    /// Check if a key exists in the cache (without reading it)
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError>;

    /// Reset the time-to-live of an existing entry
    ///
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, ApplicationError>;

    /// Remove every entry
    async fn clear(&self) -> Result<(), ApplicationError>;

    /// Whether the backend connection was established
    fn is_connected(&self) -> bool;

    /// Short backend name for logs and status output
    fn backend_name(&self) -> &'static str;

    /// Get cache statistics (hits, misses, size)
    fn stats(&self) -> CacheStats;
}

/// Extension trait for typed cache operations
///
/// Provides convenient typed get/set methods on top of the raw byte interface.
#[async_trait]
pub trait CachePortExt: CachePort {
    /// Get a typed value from cache
    async fn get<T>(&self, key: &str) -> Result<Option<T>, ApplicationError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes).map_err(|e| {
                    ApplicationError::Cache(format!("Cache deserialization error: {e}"))
                })?;
                Ok(Some(value))
            },
            None => Ok(None),
        }
    }

    /// Set a typed value in cache
    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), ApplicationError>
    where
        T: serde::Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ApplicationError::Cache(format!("Cache serialization error: {e}")))?;
        self.set_bytes(key, bytes, ttl).await
    }
}

// Blanket implementation for all CachePort implementors
impl<T: CachePort + ?Sized> CachePortExt for T {}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of failed backend operations
    pub errors: u64,
}

impl CacheStats {
    /// Calculate the hit rate as a fraction (0.0 - 1.0)
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Standard TTL values
pub mod ttl {
    use std::time::Duration;

    /// Default lifetime of a cached processing result (1 hour)
    pub const PROCESSING_RESULT: Duration = Duration::from_secs(60 * 60);
}
