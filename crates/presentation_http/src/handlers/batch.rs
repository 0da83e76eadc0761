//! Batch processing handler

use axum::{Json, extract::State};
use domain::{ProcessingRequest, ProcessingResult};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Batch request body
#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequest {
    #[validate(length(min = 1, message = "must contain at least one request"))]
    pub requests: Vec<ProcessingRequest>,
}

/// Batch response body
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Results in request order
    pub results: Vec<ProcessingResult>,
    pub count: usize,
}

/// Process every request of the batch; any failure fails the whole call
#[instrument(skip(state, body), fields(requests = body.requests.len()))]
pub async fn batch(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let results = state.batch_service.batch_process(&body.requests).await?;
    info!(count = results.len(), "Batch processed");

    Ok(Json(BatchResponse {
        count: results.len(),
        results,
    }))
}
