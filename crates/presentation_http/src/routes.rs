//! Route definitions

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{handlers, middleware::propagate_request_id, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Processing API
        .route("/api/ai/process", post(handlers::process::process))
        .route("/api/ai/batch", post(handlers::batch::batch))
        .route("/api/ai/status", get(handlers::status::status))
        .layer(middleware::from_fn(propagate_request_id))
        .with_state(state)
}
