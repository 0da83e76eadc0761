//! Configuration for the inference engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for the Gemini inference engine
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the Gemini REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for every request
    #[serde(default = "default_model")]
    pub default_model: String,

    /// API key sent in the `x-goog-api-key` header
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum output tokens when a request sets none
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature when a request sets none (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: default_model(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl InferenceConfig {
    /// Whether an API key was configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
