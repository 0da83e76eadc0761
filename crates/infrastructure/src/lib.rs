//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Gemini model
//! client, Redis and in-memory result caches, configuration loading and
//! logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::GeminiInferenceAdapter;
pub use cache::{MokaCache, MokaCacheConfig, RedisCache, connect_cache};
pub use config::{AppConfig, CacheBackend, CacheConfig, ProcessingConfig, ServerConfig};
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_tracing};
