//! Result cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis server
    #[default]
    Redis,
    /// In-process Moka cache
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Which backend stores results
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Upper bound on the startup connection attempt in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Lifetime of cached processing results in seconds (default: 1 hour)
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Memory bound of the in-process backend in megabytes
    #[serde(default = "default_memory_max_capacity_mb")]
    pub memory_max_capacity_mb: u64,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

const fn default_connect_timeout_ms() -> u64 {
    2000
}

const fn default_ttl_secs() -> u64 {
    60 * 60 // 1 hour
}

const fn default_memory_max_capacity_mb() -> u64 {
    100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            redis_url: default_redis_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            default_ttl_secs: default_ttl_secs(),
            memory_max_capacity_mb: default_memory_max_capacity_mb(),
        }
    }
}

impl CacheConfig {
    /// Lifetime of cached processing results
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}
