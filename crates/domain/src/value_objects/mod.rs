//! Value Objects - Immutable, identity-less domain primitives

mod processing_options;
mod processing_type;

pub use processing_options::{ProcessingOptions, defaults};
pub use processing_type::ProcessingType;
