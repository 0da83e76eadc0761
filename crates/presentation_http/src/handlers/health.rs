//! Health check handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheHealth,
}

/// Cache backend summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub backend: String,
    pub connected: bool,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Liveness check
///
/// Always 200: a disconnected cache only disables caching.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.processing_service.cache();
    let stats = cache.stats();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: CacheHealth {
            backend: cache.backend_name().to_string(),
            connected: cache.is_connected(),
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
        },
    })
}
