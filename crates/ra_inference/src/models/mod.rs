use std::sync::Arc;
use ra_core::{Error, Result, Summarizer, SummarizerConfig};

pub mod extractive;
pub mod openai;

pub use extractive::ExtractiveSummarizer;
pub use openai::OpenAiSummarizer;

/// Build the summarizer named by `kind` ("openai" or "extractive").
pub fn create_summarizer(kind: &str, config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    match kind {
        "openai" => Ok(Arc::new(OpenAiSummarizer::new(config.clone()))),
        "extractive" => Ok(Arc::new(ExtractiveSummarizer::new(config.target_words))),
        other => Err(Error::Configuration(format!("Unknown summarizer: {}", other))),
    }
}
