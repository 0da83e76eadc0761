//! Domain entities - Requests and the results produced for them

mod processing_request;
mod processing_result;

pub use processing_request::ProcessingRequest;
pub use processing_result::{
    GeneratedContent, Keyword, KeywordExtraction, ProcessingOutput, ProcessingResult,
    SentimentAnalysis, SentimentOutcome, Summary, Translation, INVALID_RESULT_FORMAT,
};
