use std::fmt;
use std::time::Duration;

const DAY: u64 = 24 * 60 * 60;

/// Process-wide settings, built once at startup and handed to every
/// component at construction.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub summarizer: SummarizerConfig,
    pub speech: SpeechConfig,
    pub feed: FeedConfig,
}

#[derive(Clone)]
pub struct ReaderConfig {
    pub token: Option<String>,
    pub base_url: String,
    /// Upper bound on list pages fetched per sync.
    pub page_cap: usize,
    /// Upper bound on in-scope articles collected per sync.
    pub max_results: usize,
    /// Pause between successful pages.
    pub page_delay: Duration,
    /// Retries of a single page after a 429.
    pub max_retries: u32,
    /// Wait used when a 429 carries no usable `Retry-After`.
    pub default_retry_after: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: "https://readwise.io/api/v3".to_string(),
            page_cap: 10,
            max_results: 200,
            page_delay: Duration::from_secs(3),
            max_retries: 3,
            default_retry_after: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for ReaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderConfig")
            .field("token", &self.token.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("page_cap", &self.page_cap)
            .field("max_results", &self.max_results)
            .field("page_delay", &self.page_delay)
            .field("max_retries", &self.max_retries)
            .field("default_retry_after", &self.default_retry_after)
            .finish()
    }
}

#[derive(Clone)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Characters of article text included in the prompt.
    pub max_input_chars: usize,
    pub target_words: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            max_input_chars: 6000,
            target_words: 120,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_input_chars", &self.max_input_chars)
            .field("target_words", &self.target_words)
            .finish()
    }
}

#[derive(Clone)]
pub struct SpeechConfig {
    /// No key means clients fall back to in-browser speech.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub default_voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "tts-1".to_string(),
            default_voice: "alloy".to_string(),
        }
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("default_voice", &self.default_voice)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Articles summarized per request.
    pub max_items: usize,
    pub heard_ttl: Duration,
    pub later_ttl: Duration,
    pub summary_ttl: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_items: 30,
            heard_ttl: Duration::from_secs(30 * DAY),
            later_ttl: Duration::from_secs(7 * DAY),
            summary_ttl: Duration::from_secs(30 * DAY),
        }
    }
}
