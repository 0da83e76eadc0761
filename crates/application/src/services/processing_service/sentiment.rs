//! Sentiment analysis transform

use domain::{ProcessingOutput, SentimentAnalysis, SentimentOutcome};

use super::{ProcessingService, structured::parse_structured};
use crate::{error::ApplicationError, ports::GenerationParams};

impl ProcessingService {
    pub(super) async fn analyze_sentiment(
        &self,
        content: &str,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let raw = self
            .invoke(&sentiment_prompt(content), &GenerationParams::default())
            .await?;
        let outcome = parse_structured::<SentimentAnalysis>(&raw)
            .map_or_else(SentimentOutcome::invalid_format, SentimentOutcome::Analysis);
        Ok(ProcessingOutput::Sentiment(outcome))
    }
}

fn sentiment_prompt(content: &str) -> String {
    format!(
        "Analyze the sentiment of the following text. Reply with strict JSON only, \
         no prose, in exactly this shape:\n\
         {{\"sentiment\": \"positive|negative|neutral|mixed\", \
         \"confidence\": <number from 0 to 10>, \
         \"emotionalIndicators\": [\"...\"], \
         \"explanation\": \"...\"}}\n\nText:\n{content}"
    )
}
