//! Summarization transform

use domain::{ProcessingOptions, ProcessingOutput, Summary, defaults};

use super::ProcessingService;
use crate::{error::ApplicationError, ports::GenerationParams};

impl ProcessingService {
    pub(super) async fn summarize(
        &self,
        content: &str,
        options: &ProcessingOptions,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let prompt = summary_prompt(
            content,
            options.max_length(),
            &options.style_or(defaults::SUMMARY_STYLE),
        );
        let summary = self.invoke(&prompt, &GenerationParams::default()).await?;
        Ok(ProcessingOutput::Summary(Summary::new(content, summary.trim())))
    }
}

fn summary_prompt(content: &str, max_length: u32, style: &str) -> String {
    format!(
        "Summarize the following text in at most {max_length} words, using a {style} tone. \
         Reply with the summary only.\n\nText:\n{content}"
    )
}
