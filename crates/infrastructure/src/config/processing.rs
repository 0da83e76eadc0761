//! Batch processing configuration

use std::time::Duration;

use application::BatchConfig;
use serde::{Deserialize, Serialize};

/// Windowing of batch requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Requests processed concurrently per window
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Cooldown between windows in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

const fn default_batch_size() -> usize {
    BatchConfig::DEFAULT_BATCH_SIZE
}

const fn default_batch_delay_ms() -> u64 {
    1000
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl ProcessingConfig {
    /// Executor settings derived from this configuration
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(self.batch_size, Duration::from_millis(self.batch_delay_ms))
    }
}
