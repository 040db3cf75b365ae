pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod storage;
pub mod text;
pub mod types;

pub use config::{Config, FeedConfig, ReaderConfig, SpeechConfig, SummarizerConfig};
pub use error::Error;
pub use models::{AudioStream, SpeechSynthesizer, Summarizer};
pub use source::ArticleSource;
pub use storage::KeyValueStore;
pub use types::{Article, ArticlePatch, FeedItem, FeedResponse, Location, Scope};

pub type Result<T> = std::result::Result<T, Error>;
