//! Processing type value object

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The kind of content processing a request asks for
///
/// Serialized in kebab-case (`analyze-sentiment`), which is also the form
/// used inside cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingType {
    /// Condense content into a shorter summary
    Summarize,
    /// Classify the emotional tone of content
    AnalyzeSentiment,
    /// Pull out the most relevant keywords
    ExtractKeywords,
    /// Generate new content from a prompt
    GenerateContent,
    /// Translate content into another language
    Translate,
}

impl ProcessingType {
    /// Every supported processing type
    pub const ALL: [Self; 5] = [
        Self::Summarize,
        Self::AnalyzeSentiment,
        Self::ExtractKeywords,
        Self::GenerateContent,
        Self::Translate,
    ];

    /// Wire name of this processing type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::AnalyzeSentiment => "analyze-sentiment",
            Self::ExtractKeywords => "extract-keywords",
            Self::GenerateContent => "generate-content",
            Self::Translate => "translate",
        }
    }
}

impl fmt::Display for ProcessingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnsupportedType(s.to_string()))
    }
}
