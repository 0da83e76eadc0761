//! Redis cache implementation
//!
//! Uses a multiplexed [`ConnectionManager`] that reconnects on its own once
//! the initial connection succeeded. A failed initial connection leaves the
//! cache permanently disconnected and every operation reports
//! [`ApplicationError::CacheUnavailable`].

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use tracing::{debug, info, instrument, warn};

/// Redis-backed cache
pub struct RedisCache {
    connection: Option<ConnectionManager>,
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("connected", &self.connection.is_some())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .field("errors", &self.errors.load(Ordering::Relaxed))
            .finish()
    }
}

impl RedisCache {
    /// Attempt a single connection to `url`
    ///
    /// Never fails: on error the returned cache is disconnected.
    pub async fn connect(url: &str, timeout: Duration) -> Self {
        match Self::try_connect(url, timeout).await {
            Ok(connection) => {
                info!(url = %redact(url), "Connected to Redis");
                Self::with_connection(Some(connection))
            },
            Err(e) => {
                warn!(url = %redact(url), error = %e, "Redis unavailable, caching disabled");
                Self::disconnected()
            },
        }
    }

    /// A cache that never connects
    pub fn disconnected() -> Self {
        Self::with_connection(None)
    }

    fn with_connection(connection: Option<ConnectionManager>) -> Self {
        Self {
            connection,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    async fn try_connect(url: &str, timeout: Duration) -> Result<ConnectionManager, String> {
        let client = redis::Client::open(url).map_err(|e| e.to_string())?;
        match tokio::time::timeout(timeout, ConnectionManager::new(client)).await {
            Ok(Ok(connection)) => Ok(connection),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("connection timed out after {}ms", timeout.as_millis())),
        }
    }

    /// Clone of the shared connection handle
    fn connection(&self) -> Result<ConnectionManager, ApplicationError> {
        self.connection
            .clone()
            .ok_or_else(|| ApplicationError::CacheUnavailable("Redis is not connected".to_string()))
    }

    fn failure(&self, op: &str, e: &RedisError) -> ApplicationError {
        self.errors.fetch_add(1, Ordering::Relaxed);
        ApplicationError::Cache(format!("Redis {op} failed: {e}"))
    }
}

/// Redis expirations have one-second granularity and must be positive
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Strip credentials from a connection URL before logging it
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        },
        _ => url.to_string(),
    }
}

#[async_trait]
impl CachePort for RedisCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let mut conn = self.connection()?;
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e| self.failure("GET", &e))?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache miss");
        }
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let mut conn = self.connection()?;
        let (): () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| self.failure("SET", &e))?;
        debug!(key = %key, ttl_secs = ttl_secs(ttl), "Cache set");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool, ApplicationError> {
        let mut conn = self.connection()?;
        let removed: u64 = conn.del(key).await.map_err(|e| self.failure("DEL", &e))?;
        Ok(removed > 0)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool, ApplicationError> {
        let mut conn = self.connection()?;
        conn.exists(key)
            .await
            .map_err(|e| self.failure("EXISTS", &e))
    }

    #[instrument(skip(self), level = "debug")]
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, ApplicationError> {
        let mut conn = self.connection()?;
        let updated: bool = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl_secs(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| self.failure("EXPIRE", &e))?;
        Ok(updated)
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self) -> Result<(), ApplicationError> {
        let mut conn = self.connection()?;
        let (): () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| self.failure("FLUSHDB", &e))?;
        debug!("Cache cleared");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
