//! Single-request processing handler

use axum::{Json, extract::State};
use domain::{ProcessingRequest, ProcessingResult};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Process request body: `{type, content, options}`
///
/// Field presence and the type are checked by the processing pipeline so
/// that missing fields surface as invalid-request errors.
#[derive(Debug, Deserialize, Validate)]
pub struct ProcessBody {
    #[serde(flatten)]
    pub request: ProcessingRequest,
}

/// Run one request through the cache-backed pipeline
#[instrument(skip(state, body), fields(processing_type = %body.request.processing_type))]
pub async fn process(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ProcessBody>,
) -> Result<Json<ProcessingResult>, ApiError> {
    let result = state.processing_service.process(&body.request).await?;
    Ok(Json(result))
}
