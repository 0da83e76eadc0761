//! Processing service - cache-aside dispatch of content transforms
//!
//! Each transform lives in its own submodule as an `impl ProcessingService`
//! block; this module owns validation, fingerprinting and the cache protocol.

mod generate;
mod keywords;
mod sentiment;
mod structured;
mod summarize;
mod translate;

use std::{fmt, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use domain::{ProcessingOutput, ProcessingRequest, ProcessingResult, ProcessingType};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

pub use structured::strip_code_fences;

use super::{cache_store::CacheStore, fingerprint::fingerprint};
use crate::{
    error::ApplicationError,
    ports::{GenerationParams, InferencePort, ttl},
};

/// Dispatches processing requests to the model, caching every result
pub struct ProcessingService {
    inference: Arc<dyn InferencePort>,
    cache: CacheStore,
    cache_ttl: Duration,
}

impl fmt::Debug for ProcessingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingService")
            .field("cache", &self.cache)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl ProcessingService {
    /// Create a service caching results for [`ttl::PROCESSING_RESULT`]
    pub fn new(inference: Arc<dyn InferencePort>, cache: CacheStore) -> Self {
        Self {
            inference,
            cache,
            cache_ttl: ttl::PROCESSING_RESULT,
        }
    }

    /// Override the lifetime of cached results
    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// The cache this service reads and populates
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Process a single request
    ///
    /// Validation happens before any I/O. A cached result for the same
    /// fingerprint is returned without calling the model.
    #[instrument(skip(self, request), fields(processing_type = %request.processing_type, content_len = request.content.len()))]
    pub async fn process(
        &self,
        request: &ProcessingRequest,
    ) -> Result<ProcessingResult, ApplicationError> {
        let kind = request.validate()?;
        self.process_validated(kind, request).await
    }

    /// Cache-aside processing of a request whose type was already resolved
    pub(crate) async fn process_validated(
        &self,
        kind: ProcessingType,
        request: &ProcessingRequest,
    ) -> Result<ProcessingResult, ApplicationError> {
        let key = fingerprint(request);

        if let Some(cached) = self.cache.get_json::<ProcessingResult>(&key).await {
            if cached.processing_type == kind {
                debug!(key = %key, "Cache hit");
                return Ok(cached);
            }
            warn!(key = %key, cached_type = %cached.processing_type, "Cached result has a different type, ignoring");
        }
        debug!(key = %key, "Cache miss");

        let output = self.run_transform(kind, request).await?;
        let result = ProcessingResult::new(output);

        if !self.cache.set_json(&key, &result, self.cache_ttl).await {
            debug!(key = %key, "Result was not cached");
        }

        Ok(result)
    }

    /// Report whether the model backend is reachable
    #[instrument(skip(self))]
    pub async fn status(&self) -> ServiceStatus {
        let status = if self.inference.is_healthy().await {
            ServiceState::Operational
        } else {
            ServiceState::Unavailable
        };
        ServiceStatus {
            status,
            provider: self.inference.provider(),
            model: self.inference.current_model(),
            last_checked: Utc::now(),
        }
    }

    async fn run_transform(
        &self,
        kind: ProcessingType,
        request: &ProcessingRequest,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let content = request.content.as_str();
        let options = &request.options;
        match kind {
            ProcessingType::Summarize => self.summarize(content, options).await,
            ProcessingType::AnalyzeSentiment => self.analyze_sentiment(content).await,
            ProcessingType::ExtractKeywords => self.extract_keywords(content).await,
            ProcessingType::GenerateContent => self.generate_content(content, options).await,
            ProcessingType::Translate => self.translate(content, options).await,
        }
    }

    /// Call the model, turning any failure into `ProcessingFailed`
    async fn invoke(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ApplicationError> {
        let result = self
            .inference
            .generate(prompt, params)
            .await
            .map_err(|e| {
                warn!(error = %e, "Model call failed");
                ApplicationError::ProcessingFailed(e.to_string())
            })?;

        debug!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            "Model response received"
        );

        Ok(result.content)
    }
}

/// Availability of the model backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Operational,
    Unavailable,
}

/// Snapshot returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub status: ServiceState,
    pub provider: String,
    pub model: String,
    pub last_checked: DateTime<Utc>,
}
