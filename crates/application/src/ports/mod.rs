//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod cache_port;
mod inference_port;

pub use cache_port::{CachePort, CachePortExt, CacheStats, ttl};
#[cfg(test)]
pub use cache_port::MockCachePort;
pub use inference_port::{GenerationParams, InferencePort, InferenceResult};
#[cfg(test)]
pub use inference_port::MockInferencePort;
