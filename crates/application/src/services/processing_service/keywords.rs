//! Keyword extraction transform

use domain::{Keyword, KeywordExtraction, ProcessingOutput};

use super::{ProcessingService, structured::parse_structured};
use crate::{error::ApplicationError, ports::GenerationParams};

impl ProcessingService {
    pub(super) async fn extract_keywords(
        &self,
        content: &str,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let raw = self
            .invoke(&keywords_prompt(content), &GenerationParams::default())
            .await?;
        let keywords = parse_structured::<Vec<Keyword>>(&raw).unwrap_or_default();
        Ok(ProcessingOutput::Keywords(KeywordExtraction { keywords, raw }))
    }
}

fn keywords_prompt(content: &str) -> String {
    format!(
        "Extract the most important keywords from the following text. Reply with a \
         JSON array only, ordered by relevance, where every element has the shape \
         {{\"keyword\": \"...\", \"relevance\": <number from 0 to 1>}}.\n\nText:\n{content}"
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::{ProcessingRequest, ProcessingType};

    use super::*;
    use crate::{
        services::CacheStore,
        testing::{InMemoryCache, ScriptedInference},
    };

    async fn extract(reply: &str) -> KeywordExtraction {
        let service = ProcessingService::new(
            ScriptedInference::replying(reply).into_arc(),
            CacheStore::new(Arc::new(InMemoryCache::new())),
        );
        let request = ProcessingRequest::new(
            ProcessingType::ExtractKeywords,
            "Rust makes systems programming safe and fast.",
        );
        match service.process(&request).await.unwrap().result {
            ProcessingOutput::Keywords(extraction) => extraction,
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn prompt_requests_json_array() {
        let prompt = keywords_prompt("text");
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("\"relevance\""));
    }

    #[tokio::test]
    async fn parsed_keywords_are_returned_with_raw_text() {
        let reply = "```json\n[{\"keyword\":\"Rust\",\"relevance\":0.9},\
                     {\"keyword\":\"safety\",\"relevance\":0.5}]\n```";

        let extraction = extract(reply).await;

        assert_eq!(extraction.keywords.len(), 2);
        assert_eq!(extraction.keywords[0].keyword, "Rust");
        assert!((extraction.keywords[1].relevance - 0.5).abs() < f64::EPSILON);
        assert_eq!(extraction.raw, reply);
    }

    #[tokio::test]
    async fn missing_relevance_defaults_to_zero() {
        let extraction = extract("[{\"keyword\":\"Rust\"}]").await;
        assert_eq!(extraction.keywords.len(), 1);
        assert!(extraction.keywords[0].relevance.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_to_empty_list() {
        let extraction = extract("Rust, safety, speed").await;
        assert!(extraction.keywords.is_empty());
        assert_eq!(extraction.raw, "Rust, safety, speed");
    }
}
