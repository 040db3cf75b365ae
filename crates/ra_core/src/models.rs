use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use crate::types::Article;
use crate::Result;

pub type AudioStream = BoxStream<'static, Result<Bytes>>;

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Produce a short spoken-style summary of an article.
    async fn summarize(&self, article: &Article) -> Result<String>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Start synthesizing `text`; the returned stream yields encoded audio.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioStream>;
}
