//! Domain layer for the content processing service
//!
//! Contains the processing request/result model, per-operation option
//! defaults and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
