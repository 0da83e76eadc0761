//! Application services - Use case implementations

mod batch_service;
mod cache_store;
mod fingerprint;
mod processing_service;

pub use batch_service::{BatchConfig, BatchService};
pub use cache_store::CacheStore;
pub use fingerprint::{KEY_PREFIX, canonical_form, fingerprint};
pub use processing_service::{ProcessingService, ServiceState, ServiceStatus, strip_code_fences};
