use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Summarizer error ({status}): {body}")]
    Summarizer { status: u16, body: String },

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Missing credentials can never succeed on retry, so callers that
    /// otherwise skip per-item failures must abort on these.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Status code carried by upstream and summarizer failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } | Error::Summarizer { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
