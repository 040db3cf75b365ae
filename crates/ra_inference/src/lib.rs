pub mod cache;
pub mod models;
pub mod prompt;
pub mod speech;

pub use cache::SummaryCache;
pub use models::create_summarizer;
pub use speech::OpenAiSpeech;

pub mod prelude {
    pub use super::cache::SummaryCache;
    pub use super::models::{create_summarizer, ExtractiveSummarizer, OpenAiSummarizer};
    pub use super::speech::OpenAiSpeech;
    pub use ra_core::{Article, Error, Result, SpeechSynthesizer, Summarizer};
}
