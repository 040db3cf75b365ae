use async_trait::async_trait;
use futures_util::StreamExt;
use ra_core::text::truncate_chars;
use ra_core::{AudioStream, Error, Result, SpeechConfig, SpeechSynthesizer};
use reqwest::Client;
use serde::Serialize;
use std::fmt;

/// Longest input the speech endpoint accepts.
pub const MAX_INPUT_CHARS: usize = 4096;

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: String,
    voice: &'a str,
    response_format: &'a str,
}

/// Text-to-speech through an OpenAI-compatible `audio/speech` endpoint.
pub struct OpenAiSpeech {
    client: Client,
    config: SpeechConfig,
}

impl OpenAiSpeech {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl fmt::Debug for OpenAiSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSpeech")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    fn name(&self) -> &str {
        "OpenAI TTS"
    }

    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<AudioStream> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Configuration("TTS API key is not configured".to_string()))?;

        let voice = voice
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.config.default_voice.as_str());

        let request = SpeechRequest {
            model: &self.config.model,
            input: truncate_chars(text, MAX_INPUT_CHARS),
            voice,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("{}: {}", status.as_u16(), body)));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::Tts(e.to_string())))
            .boxed())
    }
}
