//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `cache`: result cache backend and TTL
//! - `processing`: batch windowing
//!
//! Model client settings reuse [`InferenceConfig`] from `ai_core`.

mod cache;
mod processing;
mod server;

use ai_core::InferenceConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cache::{CacheBackend, CacheConfig};
pub use processing::ProcessingConfig;
pub use server::ServerConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "CONTENT_AI";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model client configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Batch processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    ///
    /// Environment variables use the `CONTENT_AI_` prefix and `__` between
    /// nested keys, e.g. `CONTENT_AI_SERVER__PORT=8080` or
    /// `CONTENT_AI_CACHE__REDIS_URL=redis://cache:6379`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(config::File::with_name("config").required(false))
    }

    /// Load configuration from a specific file source plus the environment
    pub fn load_from<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .add_source(file)
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.processing.batch_size == 0 {
            return Err(config::ConfigError::Message(
                "processing.batch_size must be at least 1".to_string(),
            ));
        }
        if self.cache.default_ttl_secs == 0 {
            return Err(config::ConfigError::Message(
                "cache.default_ttl_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
