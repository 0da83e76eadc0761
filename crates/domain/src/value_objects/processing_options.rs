//! Operation-specific processing options
//!
//! Options arrive as a free-form JSON object. Each transform reads only the
//! keys it recognizes; unknown keys are kept (they still take part in the
//! request fingerprint) but otherwise ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Documented fallbacks for options that are missing or malformed
pub mod defaults {
    /// Word limit for summaries
    pub const SUMMARY_MAX_LENGTH: u32 = 150;
    /// Tone of summaries
    pub const SUMMARY_STYLE: &str = "concise";
    /// Tone of generated content
    pub const GENERATION_STYLE: &str = "professional";
    /// Sampling temperature for content generation
    pub const TEMPERATURE: f32 = 0.7;
    /// Output token budget for content generation
    pub const MAX_TOKENS: u32 = 1024;
    /// Translation target language
    pub const TARGET_LANGUAGE: &str = "Spanish";
    /// Whether translations keep the source formatting
    pub const PRESERVE_FORMATTING: bool = true;
}

const MAX_LENGTH: &str = "maxLength";
const STYLE: &str = "style";
const TARGET_LANGUAGE: &str = "targetLanguage";
const TEMPERATURE: &str = "temperature";
const MAX_TOKENS: &str = "maxTokens";
const PRESERVE_FORMATTING: &str = "preserveFormatting";

/// Free-form options attached to a processing request
///
/// Backed by an ordered map so that serialization is stable regardless of
/// the order in which the client sent the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingOptions(BTreeMap<String, Value>);

impl ProcessingOptions {
    /// Create an empty option set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an option
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw access to an option value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate options in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of options present
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no options were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Word limit for summaries
    #[must_use]
    pub fn max_length(&self) -> u32 {
        self.positive_u32(MAX_LENGTH)
            .unwrap_or(defaults::SUMMARY_MAX_LENGTH)
    }

    /// Requested tone, falling back to the given per-operation default
    #[must_use]
    pub fn style_or(&self, default: &str) -> String {
        self.non_empty_str(STYLE).unwrap_or(default).to_string()
    }

    /// Translation target language
    #[must_use]
    pub fn target_language(&self) -> String {
        self.non_empty_str(TARGET_LANGUAGE)
            .unwrap_or(defaults::TARGET_LANGUAGE)
            .to_string()
    }

    /// Sampling temperature, clamped to the 0.0 - 2.0 range models accept
    ///
    /// An explicit `0` is honored; only a missing or non-numeric value falls
    /// back to the default.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn temperature(&self) -> f32 {
        self.0
            .get(TEMPERATURE)
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite())
            .map_or(defaults::TEMPERATURE, |t| t.clamp(0.0, 2.0) as f32)
    }

    /// Output token budget for generation
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.positive_u32(MAX_TOKENS)
            .unwrap_or(defaults::MAX_TOKENS)
    }

    /// Whether a translation should keep the source formatting
    #[must_use]
    pub fn preserve_formatting(&self) -> bool {
        self.0
            .get(PRESERVE_FORMATTING)
            .and_then(Value::as_bool)
            .unwrap_or(defaults::PRESERVE_FORMATTING)
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn positive_u32(&self, key: &str) -> Option<u32> {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
    }
}

impl FromIterator<(String, Value)> for ProcessingOptions {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
