//! Free-form content generation transform

use domain::{GeneratedContent, ProcessingOptions, ProcessingOutput, defaults};

use super::ProcessingService;
use crate::{error::ApplicationError, ports::GenerationParams};

impl ProcessingService {
    pub(super) async fn generate_content(
        &self,
        content: &str,
        options: &ProcessingOptions,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let style = options.style_or(defaults::GENERATION_STYLE);
        let params = GenerationParams::new(options.temperature(), options.max_tokens());
        let generated = self.invoke(&generation_prompt(content, &style), &params).await?;
        Ok(ProcessingOutput::Generated(GeneratedContent::new(
            generated, style,
        )))
    }
}

fn generation_prompt(content: &str, style: &str) -> String {
    format!("Write content in a {style} style for the following request.\n\nRequest:\n{content}")
}
