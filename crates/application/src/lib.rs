//! Application layer - Use cases and orchestration
//!
//! Contains the cache-backed processing pipeline (fingerprinting, cache-aside
//! dispatch, batched execution) and the port definitions that infrastructure
//! adapters implement.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
