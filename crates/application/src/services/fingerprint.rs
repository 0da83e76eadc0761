//! Request fingerprinting
//!
//! Derives the cache key of a request from a canonical serialization of
//! `[type, content, options]` with object keys sorted at every depth.

use domain::ProcessingRequest;
use serde_json::{Map, Value, json};

/// Prefix shared by every processing cache key
pub const KEY_PREFIX: &str = "ai";

/// Compute the cache key of a request: `ai:<type>:<blake3 hex>`
///
/// Pure: two requests with equal type, content and options always map to the
/// same key regardless of option insertion order.
pub fn fingerprint(request: &ProcessingRequest) -> String {
    let canonical = canonical_form(request);
    let hash = blake3::hash(canonical.as_bytes());
    format!("{KEY_PREFIX}:{}:{}", request.processing_type, hash.to_hex())
}

/// Stable serialization hashed by [`fingerprint`]
pub fn canonical_form(request: &ProcessingRequest) -> String {
    let options = Value::Object(
        request
            .options
            .iter()
            .map(|(k, v)| (k.clone(), canonicalize(v)))
            .collect(),
    );
    json!([request.processing_type, request.content, options]).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        },
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
