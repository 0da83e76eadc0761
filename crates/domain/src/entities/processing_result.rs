//! Processing result envelope and per-operation payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ProcessingType;

/// Error text reported when structured model output cannot be parsed
pub const INVALID_RESULT_FORMAT: &str = "Invalid result format";

/// Result envelope returned for every successful processing call
///
/// This is also the value stored in the cache, so it must survive a JSON
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Processing type that produced the result
    #[serde(rename = "type")]
    pub processing_type: ProcessingType,
    /// Operation-specific payload
    pub result: ProcessingOutput,
    /// When the result was produced
    pub processing_timestamp: DateTime<Utc>,
}

impl ProcessingResult {
    /// Wrap an output, stamping it with the current time
    #[must_use]
    pub fn new(result: ProcessingOutput) -> Self {
        Self::with_timestamp(result, Utc::now())
    }

    /// Wrap an output with an explicit timestamp
    #[must_use]
    pub fn with_timestamp(result: ProcessingOutput, processing_timestamp: DateTime<Utc>) -> Self {
        Self {
            processing_type: result.processing_type(),
            result,
            processing_timestamp,
        }
    }
}

/// Operation-specific result payload
///
/// Untagged on the wire: the envelope's `type` carries the discriminator.
/// Variants are ordered so that each one has a required field the earlier
/// ones lack, which keeps deserialization unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessingOutput {
    Summary(Summary),
    Translation(Translation),
    Generated(GeneratedContent),
    Keywords(KeywordExtraction),
    Sentiment(SentimentOutcome),
}

impl ProcessingOutput {
    /// The processing type this payload belongs to
    #[must_use]
    pub const fn processing_type(&self) -> ProcessingType {
        match self {
            Self::Summary(_) => ProcessingType::Summarize,
            Self::Translation(_) => ProcessingType::Translate,
            Self::Generated(_) => ProcessingType::GenerateContent,
            Self::Keywords(_) => ProcessingType::ExtractKeywords,
            Self::Sentiment(_) => ProcessingType::AnalyzeSentiment,
        }
    }
}

/// Summarization payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    /// Length of the source content in characters
    pub original_length: usize,
    /// Length of the summary in characters
    pub summary_length: usize,
    /// `original_length / summary_length`, or 0 for an empty summary
    pub compression_ratio: f64,
}

impl Summary {
    /// Build a summary payload, computing lengths and the compression ratio
    pub fn new(original: &str, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        let original_length = original.chars().count();
        let summary_length = summary.chars().count();
        let compression_ratio = if summary_length == 0 {
            0.0
        } else {
            original_length as f64 / summary_length as f64
        };
        Self {
            summary,
            original_length,
            summary_length,
            compression_ratio,
        }
    }
}

/// Translation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    /// Always `auto-detected`; the source language is never detected
    pub source_language: String,
    pub target_language: String,
    pub preserve_formatting: bool,
}

/// Content generation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    /// Number of whitespace-separated words in `content`
    pub word_count: usize,
    pub style: String,
}

impl GeneratedContent {
    pub fn new(content: impl Into<String>, style: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count();
        Self {
            content,
            word_count,
            style: style.into(),
        }
    }
}

/// Keyword extraction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordExtraction {
    /// Parsed keywords; empty when the model output was not valid JSON
    pub keywords: Vec<Keyword>,
    /// Model output as received
    pub raw: String,
}

/// A single extracted keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    #[serde(default)]
    pub relevance: f64,
}

/// Sentiment payload: either the parsed analysis or an error marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentOutcome {
    Analysis(SentimentAnalysis),
    Invalid { error: String },
}

impl SentimentOutcome {
    /// Marker used when the model output could not be parsed
    #[must_use]
    pub fn invalid_format() -> Self {
        Self::Invalid {
            error: INVALID_RESULT_FORMAT.to_string(),
        }
    }
}

/// Structured sentiment analysis as returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    /// Sentiment label (e.g. positive, negative, neutral, mixed)
    pub sentiment: String,
    /// Confidence on a 0-10 scale
    pub confidence: f64,
    #[serde(default)]
    pub emotional_indicators: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}
