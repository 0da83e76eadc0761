//! Cache implementations
//!
//! Provides the cache adapters behind the application's `CachePort`:
//! - `RedisCache`: shared cache on a Redis server
//! - `MokaCache`: in-process cache with per-entry TTL

mod moka_cache;
mod redis_cache;

use std::{sync::Arc, time::Duration};

use application::ports::CachePort;
use tracing::info;

pub use moka_cache::{MokaCache, MokaCacheConfig};
pub use redis_cache::RedisCache;

use crate::config::{CacheBackend, CacheConfig};

/// Build the cache backend selected by configuration
///
/// A disabled cache, or a Redis server that cannot be reached, yields a
/// disconnected backend; the processing pipeline then runs uncached.
pub async fn connect_cache(config: &CacheConfig) -> Arc<dyn CachePort> {
    if !config.enabled {
        info!("Result caching disabled by configuration");
        return Arc::new(RedisCache::disconnected());
    }

    match config.backend {
        CacheBackend::Redis => Arc::new(
            RedisCache::connect(
                &config.redis_url,
                Duration::from_millis(config.connect_timeout_ms),
            )
            .await,
        ),
        CacheBackend::Memory => {
            info!(max_capacity_mb = config.memory_max_capacity_mb, "Using in-memory cache");
            Arc::new(MokaCache::with_config(MokaCacheConfig {
                max_capacity_mb: config.memory_max_capacity_mb,
            }))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_cache_is_disconnected() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(!connect_cache(&config).await.is_connected());
    }

    #[tokio::test]
    async fn memory_backend_is_connected() {
        let config = CacheConfig {
            backend: CacheBackend::Memory,
            ..Default::default()
        };
        let cache = connect_cache(&config).await;
        assert!(cache.is_connected());
        assert_eq!(cache.backend_name(), "memory");
    }

    #[tokio::test]
    async fn unreachable_redis_falls_back_to_disconnected() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            redis_url: "redis://127.0.0.1:1".to_string(),
            connect_timeout_ms: 300,
            ..Default::default()
        };
        let cache = connect_cache(&config).await;
        assert!(!cache.is_connected());
        assert_eq!(cache.backend_name(), "redis");
    }
}
