//! Batch service - windowed execution of many processing requests
//!
//! Requests run in consecutive windows of `batch_size`. Requests inside a
//! window run concurrently, windows run one after another with a cooldown in
//! between to stay under the model provider's rate limits.

use std::{sync::Arc, time::Duration};

use domain::{ProcessingRequest, ProcessingResult};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::processing_service::ProcessingService;
use crate::error::ApplicationError;

/// Window size and cooldown of the batch executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Requests processed concurrently per window (at least 1)
    pub batch_size: usize,
    /// Pause between two windows
    pub batch_delay: Duration,
}

impl BatchConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 5;
    pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1000);

    /// Create a config; a zero batch size is raised to 1
    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATCH_SIZE, Self::DEFAULT_BATCH_DELAY)
    }
}

/// Executes ordered sequences of requests through a [`ProcessingService`]
#[derive(Debug, Clone)]
pub struct BatchService {
    processor: Arc<ProcessingService>,
    config: BatchConfig,
}

impl BatchService {
    pub fn new(processor: Arc<ProcessingService>, config: BatchConfig) -> Self {
        Self { processor, config }
    }

    pub const fn config(&self) -> BatchConfig {
        self.config
    }

    /// Process every request, returning results in input order
    ///
    /// All requests are validated before the first model call. The first
    /// failing window aborts the whole call and no partial results are
    /// returned.
    #[instrument(skip(self, requests), fields(count = requests.len(), batch_size = self.config.batch_size))]
    pub async fn batch_process(
        &self,
        requests: &[ProcessingRequest],
    ) -> Result<Vec<ProcessingResult>, ApplicationError> {
        let kinds = requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                request.validate().inspect_err(|e| {
                    debug!(index, error = %e, "Rejecting batch with invalid request");
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let size = self.config.batch_size;
        let mut results = Vec::with_capacity(requests.len());

        for (window_index, (window, window_kinds)) in
            requests.chunks(size).zip(kinds.chunks(size)).enumerate()
        {
            if window_index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            let outcomes = join_all(
                window
                    .iter()
                    .zip(window_kinds)
                    .map(|(request, kind)| self.processor.process_validated(*kind, request)),
            )
            .await;

            for outcome in outcomes {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        warn!(window_index, error = %e, "Batch window failed");
                        return Err(ApplicationError::in_batch_window(window_index, e));
                    },
                }
            }
            debug!(window_index, completed = results.len(), "Batch window completed");
        }

        info!(count = results.len(), "Batch completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use domain::{DomainError, ProcessingOutput, ProcessingType};

    use super::*;
    use crate::{
        services::CacheStore,
        testing::{InMemoryCache, ScriptedInference},
    };

    fn batch_service(inference: Arc<ScriptedInference>, config: BatchConfig) -> BatchService {
        let processor = ProcessingService::new(
            inference,
            CacheStore::new(Arc::new(InMemoryCache::new())),
        );
        BatchService::new(Arc::new(processor), config)
    }

    fn items(count: usize) -> Vec<ProcessingRequest> {
        (0..count)
            .map(|i| ProcessingRequest::new(ProcessingType::GenerateContent, format!("item-{i}")))
            .collect()
    }

    /// Replies with the last prompt line, which is the request content
    fn echo() -> ScriptedInference {
        ScriptedInference::new(|prompt| Ok(prompt.lines().last().unwrap_or_default().to_string()))
    }

    fn item_index(prompt: &str) -> u64 {
        prompt
            .rsplit('-')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    fn generated_text(result: &ProcessingResult) -> &str {
        match &result.result {
            ProcessingOutput::Generated(generated) => &generated.content,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn zero_batch_size_is_raised_to_one() {
        assert_eq!(BatchConfig::new(0, Duration::ZERO).batch_size, 1);
    }

    #[test]
    fn default_config_uses_five_and_one_second() {
        let config = BatchConfig::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.batch_delay, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn results_follow_input_order_not_completion_order() {
        // Earlier items take longer, so completion order is reversed
        let inference = echo()
            .with_delay(|prompt| Duration::from_millis(60 - 10 * item_index(prompt)))
            .into_arc();
        let service = batch_service(inference, BatchConfig::new(5, Duration::ZERO));
        let requests = items(5);

        let results = service.batch_process(&requests).await.unwrap();

        let texts: Vec<&str> = results.iter().map(generated_text).collect();
        assert_eq!(texts, vec!["item-0", "item-1", "item-2", "item-3", "item-4"]);
    }

    #[tokio::test]
    async fn failure_in_first_window_fails_whole_batch() {
        let inference = ScriptedInference::new(|prompt| {
            if prompt.ends_with("item-1") {
                Err(ApplicationError::Inference("model overloaded".to_string()))
            } else {
                Ok("fine".to_string())
            }
        })
        .into_arc();
        let service = batch_service(inference.clone(), BatchConfig::new(5, Duration::ZERO));

        let err = service.batch_process(&items(7)).await.unwrap_err();

        match err {
            ApplicationError::BatchProcessingFailed {
                window_index,
                source,
            } => {
                assert_eq!(window_index, 0);
                assert!(matches!(*source, ApplicationError::ProcessingFailed(_)));
            },
            other => panic!("unexpected error: {other:?}"),
        }
        // The whole first window ran, the second never started
        assert_eq!(inference.calls(), 5);
    }

    #[tokio::test]
    async fn failure_in_later_window_reports_its_index() {
        let inference = ScriptedInference::new(|prompt| {
            if prompt.ends_with("item-5") {
                Err(ApplicationError::Inference("boom".to_string()))
            } else {
                Ok("fine".to_string())
            }
        })
        .into_arc();
        let service = batch_service(inference, BatchConfig::new(2, Duration::ZERO));

        let err = service.batch_process(&items(7)).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::BatchProcessingFailed { window_index: 2, .. }
        ));
    }

    #[tokio::test]
    async fn invalid_request_rejects_batch_before_any_model_call() {
        let inference = echo().into_arc();
        let service = batch_service(inference.clone(), BatchConfig::default());
        let mut requests = items(6);
        requests[4] = ProcessingRequest::from_raw("summarize", "");

        let err = service.batch_process(&requests).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidRequest(_))
        ));
        assert_eq!(inference.calls(), 0);
    }

    #[tokio::test]
    async fn unsupported_type_rejects_batch_up_front() {
        let inference = echo().into_arc();
        let service = batch_service(inference.clone(), BatchConfig::default());
        let mut requests = items(3);
        requests.push(ProcessingRequest::from_raw("paraphrase", "text"));

        let err = service.batch_process(&requests).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::UnsupportedType(_))
        ));
        assert_eq!(inference.calls(), 0);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_batch_size() {
        let inference = echo()
            .with_delay(|_| Duration::from_millis(20))
            .into_arc();
        let service = batch_service(inference.clone(), BatchConfig::new(3, Duration::ZERO));

        let results = service.batch_process(&items(7)).await.unwrap();

        assert_eq!(results.len(), 7);
        assert_eq!(inference.max_in_flight(), 3);
        assert_eq!(inference.calls(), 7);
    }

    #[tokio::test]
    async fn cooldown_runs_between_windows_only() {
        let inference = echo().into_arc();
        let service = batch_service(
            inference,
            BatchConfig::new(2, Duration::from_millis(50)),
        );

        let start = Instant::now();
        service.batch_process(&items(6)).await.unwrap();
        let elapsed = start.elapsed();

        // Three windows, two pauses
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(150) + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn single_window_does_not_sleep() {
        let inference = echo().into_arc();
        let service = batch_service(inference, BatchConfig::new(5, Duration::from_secs(5)));

        let start = Instant::now();
        service.batch_process(&items(5)).await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn empty_batch_returns_no_results() {
        let inference = echo().into_arc();
        let service = batch_service(inference.clone(), BatchConfig::default());

        let results = service.batch_process(&[]).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(inference.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_requests_in_later_windows_hit_the_cache() {
        let inference = echo().into_arc();
        let service = batch_service(inference.clone(), BatchConfig::new(1, Duration::ZERO));
        let request = ProcessingRequest::new(ProcessingType::GenerateContent, "same");

        let results = service
            .batch_process(&[request.clone(), request.clone(), request])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(inference.calls(), 1);
    }
}
