//! Translation transform

use domain::{ProcessingOptions, ProcessingOutput, Translation};

use super::ProcessingService;
use crate::{error::ApplicationError, ports::GenerationParams};

/// Reported source language; the source language is never detected
const AUTO_DETECTED: &str = "auto-detected";

impl ProcessingService {
    pub(super) async fn translate(
        &self,
        content: &str,
        options: &ProcessingOptions,
    ) -> Result<ProcessingOutput, ApplicationError> {
        let target_language = options.target_language();
        let preserve_formatting = options.preserve_formatting();
        let prompt = translation_prompt(content, &target_language, preserve_formatting);
        let translated = self.invoke(&prompt, &GenerationParams::default()).await?;
        let translated_text = if preserve_formatting {
            translated
        } else {
            translated.trim().to_string()
        };

        Ok(ProcessingOutput::Translation(Translation {
            translated_text,
            source_language: AUTO_DETECTED.to_string(),
            target_language,
            preserve_formatting,
        }))
    }
}

fn translation_prompt(content: &str, target_language: &str, preserve_formatting: bool) -> String {
    let formatting = if preserve_formatting {
        "Preserve the original formatting exactly, including line breaks, lists and markup. "
    } else {
        ""
    };
    format!(
        "Translate the following text to {target_language}. {formatting}\
         Reply with the translation only.\n\nText:\n{content}"
    )
}
