use async_trait::async_trait;
use ra_core::{Article, Error, Result, Summarizer, SummarizerConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prompt::build_prompt;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible `chat/completions` endpoint.
///
/// Each call is a single attempt; rate limits and server errors come back
/// as [`Error::Summarizer`] for the caller to deal with.
pub struct OpenAiSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl OpenAiSummarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: SummarizerConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Configuration("Summarizer API key is not configured".to_string()))
    }
}

impl fmt::Debug for OpenAiSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSummarizer")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize(&self, article: &Article) -> Result<String> {
        let api_key = self.api_key()?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(article, &self.config),
            }],
            max_tokens: self.config.max_tokens,
            temperature: 0.3,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Summarizer {
                status: status.as_u16(),
                body,
            });
        }

        let summary = serde_json::from_str::<ChatResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        summary.ok_or(Error::Summarizer {
            status: status.as_u16(),
            body,
        })
    }
}
