//! Cache store - failure-tolerant facade over a [`CachePort`]
//!
//! Every operation degrades to a miss or no-op instead of failing the caller.
//! Backend errors are logged with the operation name and key.

use std::{sync::Arc, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::ApplicationError,
    ports::{CachePort, CachePortExt, CacheStats},
};

/// Shared handle to the cache backend
#[derive(Debug, Clone)]
pub struct CacheStore {
    port: Arc<dyn CachePort>,
}

impl CacheStore {
    /// Wrap a cache backend
    pub fn new(port: Arc<dyn CachePort>) -> Self {
        Self { port }
    }

    /// Whether the backend connection was established at startup
    pub fn is_connected(&self) -> bool {
        self.port.is_connected()
    }

    /// Backend name for logs and status output
    pub fn backend_name(&self) -> &'static str {
        self.port.backend_name()
    }

    /// Backend statistics
    pub fn stats(&self) -> CacheStats {
        self.port.stats()
    }

    /// Read a string entry; absent, unreachable and undecodable all read as `None`
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.ready("get", key) {
            return None;
        }
        match self.port.get_bytes(key).await {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(op = "get", key = %key, error = %e, "Cached value is not valid UTF-8");
                    None
                },
            },
            Ok(None) => None,
            Err(e) => {
                log_failure("get", key, &e);
                None
            },
        }
    }

    /// Store a string entry with a time-to-live, returning whether it was written
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        if !self.ready("set", key) {
            return false;
        }
        match self
            .port
            .set_bytes(key, value.as_bytes().to_vec(), ttl)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log_failure("set", key, &e);
                false
            },
        }
    }

    /// Remove an entry, returning whether one was removed
    pub async fn delete(&self, key: &str) -> bool {
        if !self.ready("delete", key) {
            return false;
        }
        self.port.delete(key).await.unwrap_or_else(|e| {
            log_failure("delete", key, &e);
            false
        })
    }

    /// Whether an entry is present
    pub async fn exists(&self, key: &str) -> bool {
        if !self.ready("exists", key) {
            return false;
        }
        self.port.exists(key).await.unwrap_or_else(|e| {
            log_failure("exists", key, &e);
            false
        })
    }

    /// Reset the time-to-live of an existing entry
    pub async fn expire(&self, key: &str, ttl: Duration) -> bool {
        if !self.ready("expire", key) {
            return false;
        }
        self.port.expire(key, ttl).await.unwrap_or_else(|e| {
            log_failure("expire", key, &e);
            false
        })
    }

    /// Remove every entry
    pub async fn clear(&self) -> bool {
        if !self.ready("clear", "*") {
            return false;
        }
        match self.port.clear().await {
            Ok(()) => true,
            Err(e) => {
                log_failure("clear", "*", &e);
                false
            },
        }
    }

    /// Read and decode a JSON entry
    ///
    /// An entry that no longer decodes as `T` is treated as a miss.
    pub async fn get_json<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        if !self.ready("get", key) {
            return None;
        }
        self.port.get::<T>(key).await.unwrap_or_else(|e| {
            log_failure("get", key, &e);
            None
        })
    }

    /// Encode a value as JSON and store it
    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> bool
    where
        T: Serialize + Send + Sync,
    {
        if !self.ready("set", key) {
            return false;
        }
        match self.port.set(key, value, ttl).await {
            Ok(()) => true,
            Err(e) => {
                log_failure("set", key, &e);
                false
            },
        }
    }

    fn ready(&self, op: &'static str, key: &str) -> bool {
        let connected = self.port.is_connected();
        if !connected {
            debug!(op, key = %key, backend = self.port.backend_name(), "Cache not connected, skipping");
        }
        connected
    }
}

fn log_failure(op: &'static str, key: &str, error: &ApplicationError) {
    warn!(op, key = %key, error = %error, "Cache operation failed");
}
