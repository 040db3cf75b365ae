use clap::Args;
use ra_core::{Config, FeedConfig, ReaderConfig, SpeechConfig, SummarizerConfig};

use crate::duration::HumanDuration;

#[derive(Args, Debug)]
pub struct ReaderArgs {
    /// Readwise access token
    #[arg(long, env = "READWISE_TOKEN", hide_env_values = true, global = true)]
    pub readwise_token: Option<String>,
    #[arg(long, default_value = "https://readwise.io/api/v3", global = true)]
    pub reader_url: String,
    /// Maximum list pages fetched per sync
    #[arg(long, default_value_t = 10, global = true)]
    pub page_cap: usize,
    /// Maximum in-scope articles collected per sync
    #[arg(long, default_value_t = 200, global = true)]
    pub max_results: usize,
    #[arg(long, default_value = "3s", global = true)]
    pub page_delay: HumanDuration,
    /// Retries of a rate-limited page
    #[arg(long, default_value_t = 3, global = true)]
    pub max_retries: u32,
    /// Wait used when a 429 has no Retry-After header
    #[arg(long, default_value = "10s", global = true)]
    pub retry_after: HumanDuration,
}

#[derive(Args, Debug)]
pub struct SummarizerArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_key: Option<String>,
    #[arg(long, default_value = "https://api.openai.com/v1", global = true)]
    pub openai_url: String,
    #[arg(long, default_value = "gpt-4o-mini", global = true)]
    pub model: String,
    #[arg(long, default_value_t = 300, global = true)]
    pub max_tokens: u32,
    /// Characters of article text sent for summarization
    #[arg(long, default_value_t = 6000, global = true)]
    pub max_input_chars: usize,
    /// Approximate length of a spoken summary
    #[arg(long, default_value_t = 120, global = true)]
    pub target_words: usize,
}

#[derive(Args, Debug)]
pub struct SpeechArgs {
    /// Text-to-speech key; without it clients speak in the browser
    #[arg(long, env = "TTS_API_KEY", hide_env_values = true, global = true)]
    pub tts_key: Option<String>,
    #[arg(long, default_value = "https://api.openai.com/v1", global = true)]
    pub tts_url: String,
    #[arg(long, default_value = "tts-1", global = true)]
    pub tts_model: String,
    #[arg(long, default_value = "alloy", global = true)]
    pub voice: String,
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Articles summarized per sync
    #[arg(long, default_value_t = 30, global = true)]
    pub max_items: usize,
    #[arg(long, default_value = "30d", global = true)]
    pub heard_ttl: HumanDuration,
    #[arg(long, default_value = "7d", global = true)]
    pub later_ttl: HumanDuration,
    #[arg(long, default_value = "30d", global = true)]
    pub summary_ttl: HumanDuration,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn build_config(
    reader: ReaderArgs,
    summarizer: SummarizerArgs,
    speech: SpeechArgs,
    feed: FeedArgs,
) -> Config {
    Config {
        reader: ReaderConfig {
            token: non_empty(reader.readwise_token),
            base_url: reader.reader_url,
            page_cap: reader.page_cap,
            max_results: reader.max_results,
            page_delay: reader.page_delay.into(),
            max_retries: reader.max_retries,
            default_retry_after: reader.retry_after.into(),
        },
        summarizer: SummarizerConfig {
            api_key: non_empty(summarizer.openai_key),
            base_url: summarizer.openai_url,
            model: summarizer.model,
            max_tokens: summarizer.max_tokens,
            max_input_chars: summarizer.max_input_chars,
            target_words: summarizer.target_words,
        },
        speech: SpeechConfig {
            api_key: non_empty(speech.tts_key),
            base_url: speech.tts_url,
            model: speech.tts_model,
            default_voice: speech.voice,
        },
        feed: FeedConfig {
            max_items: feed.max_items,
            heard_ttl: feed.heard_ttl.into(),
            later_ttl: feed.later_ttl.into(),
            summary_ttl: feed.summary_ttl.into(),
        },
    }
}
