use async_trait::async_trait;
use ra_core::{Article, Result, Summarizer};

/// Offline summarizer that reads out the opening words of an article.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    target_words: usize,
}

impl ExtractiveSummarizer {
    pub fn new(target_words: usize) -> Self {
        Self { target_words }
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "Extractive"
    }

    async fn summarize(&self, article: &Article) -> Result<String> {
        let text = article.text();
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(article.display_title());
        }

        let mut summary = words
            .iter()
            .take(self.target_words)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if words.len() > self.target_words {
            summary.push_str("...");
        }
        Ok(summary)
    }
}
