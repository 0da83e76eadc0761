//! Parsing of structured (JSON) model output

use serde::de::DeserializeOwned;
use tracing::debug;

/// Remove a surrounding markdown code fence from model output
///
/// Strips a leading "```json" (or bare "```") marker and a trailing "```"
/// marker, tolerating surrounding whitespace. Text without fences is only
/// trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse fenced or bare JSON model output, `None` when it does not match `T`
pub(super) fn parse_structured<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str(strip_code_fences(text)) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Model output is not valid structured JSON");
            None
        },
    }
}
