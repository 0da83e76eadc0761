//! Test doubles shared by the service tests

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    error::ApplicationError,
    ports::{CachePort, CacheStats, GenerationParams, InferencePort, InferenceResult},
};

/// HashMap-backed cache; TTLs are recorded but never enforced
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Duration)>>,
    disconnected: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disconnected() -> Self {
        let cache = Self::default();
        cache.disconnected.store(true, Ordering::SeqCst);
        cache
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().await.get(key).map(|(_, ttl)| *ttl)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    fn check(&self) -> Result<(), ApplicationError> {
        if self.disconnected.load(Ordering::SeqCst) {
            Err(ApplicationError::CacheUnavailable("not connected".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        self.check()?;
        Ok(self.entries.lock().await.get(key).map(|(v, _)| v.clone()))
    }

    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        self.check()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, ApplicationError> {
        self.check()?;
        Ok(self.entries.lock().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, ApplicationError> {
        self.check()?;
        Ok(self.entries.lock().await.contains_key(key))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, ApplicationError> {
        self.check()?;
        Ok(self
            .entries
            .lock()
            .await
            .get_mut(key)
            .map(|entry| entry.1 = ttl)
            .is_some())
    }

    async fn clear(&self) -> Result<(), ApplicationError> {
        self.check()?;
        self.entries.lock().await.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }

    fn backend_name(&self) -> &'static str {
        "in-memory-test"
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

type Responder = dyn Fn(&str) -> Result<String, ApplicationError> + Send + Sync;

/// Model double answering from a closure, counting calls and concurrency
pub struct ScriptedInference {
    responder: Box<Responder>,
    delay: Box<dyn Fn(&str) -> Duration + Send + Sync>,
    calls: AtomicU32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    prompts: std::sync::Mutex<Vec<String>>,
    params: std::sync::Mutex<Vec<GenerationParams>>,
}

impl ScriptedInference {
    pub fn new(
        responder: impl Fn(&str) -> Result<String, ApplicationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: Box::new(|_| Duration::ZERO),
            calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
            params: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same text
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Simulate latency derived from the prompt
    pub fn with_delay(mut self, delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok()?.last().cloned()
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        self.params.lock().ok()?.last().copied()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl std::fmt::Debug for ScriptedInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedInference")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InferencePort for ScriptedInference {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<InferenceResult, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Ok(mut recorded) = self.params.lock() {
            recorded.push(*params);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = (self.delay)(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = (self.responder)(prompt);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        outcome.map(|content| InferenceResult {
            content,
            model: "scripted-model".to_string(),
            tokens_used: None,
            latency_ms: 0,
        })
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    fn current_model(&self) -> String {
        "scripted-model".to_string()
    }

    fn provider(&self) -> String {
        "scripted".to_string()
    }
}
