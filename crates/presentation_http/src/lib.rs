//! HTTP presentation layer
//!
//! Exposes the content processing pipeline over a JSON API.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{REQUEST_ID_HEADER, RequestId, ValidatedJson, ValidationError};
pub use routes::create_router;
pub use state::AppState;
