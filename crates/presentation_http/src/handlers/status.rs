//! Service status handler

use application::ServiceStatus;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Report whether the model provider is reachable and which model is used
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.processing_service.status().await)
}
