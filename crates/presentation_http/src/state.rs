//! Application state shared across handlers

use std::sync::Arc;

use application::{BatchConfig, BatchService, ProcessingService};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Single-request processing with cache-aside
    pub processing_service: Arc<ProcessingService>,
    /// Windowed execution of request batches
    pub batch_service: Arc<BatchService>,
}

impl AppState {
    /// Build the state around one processing service shared by both routes
    pub fn new(processing_service: ProcessingService, batch_config: BatchConfig) -> Self {
        let processing_service = Arc::new(processing_service);
        let batch_service = Arc::new(BatchService::new(
            Arc::clone(&processing_service),
            batch_config,
        ));
        Self {
            processing_service,
            batch_service,
        }
    }
}
