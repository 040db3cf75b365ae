use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::text;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const ARTICLE_CATEGORY: &str = "article";
pub const READER_URL_BASE: &str = "https://read.readwise.io/read";

/// Where a document lives in the upstream store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    New,
    Later,
    Shortlist,
    Archive,
    Feed,
    #[serde(other)]
    Other,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::New => "new",
            Location::Later => "later",
            Location::Shortlist => "shortlist",
            Location::Archive => "archive",
            Location::Feed => "feed",
            Location::Other => "other",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of the reading queue a client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Feed,
    Library,
}

impl Scope {
    /// Archived documents are never part of any scope.
    pub fn includes(&self, location: Location) -> bool {
        match (self, location) {
            (_, Location::Archive) => false,
            (Scope::All, _) => true,
            (Scope::Feed, Location::New | Location::Feed) => true,
            (Scope::Library, Location::Later | Location::Shortlist) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Feed => "feed",
            Scope::Library => "library",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Scope::All),
            "feed" => Ok(Scope::Feed),
            "library" => Ok(Scope::Library),
            other => Err(format!("Unknown location scope: {}", other)),
        }
    }
}

/// A document as returned by the upstream list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Link into the reader app itself.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "html_content")]
    pub body: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn location(&self) -> Location {
        self.location.unwrap_or(Location::Other)
    }

    pub fn is_article(&self) -> bool {
        self.category.as_deref() == Some(ARTICLE_CATEGORY)
    }

    /// Only non-archived articles are ever shown to the listener.
    pub fn is_candidate(&self) -> bool {
        self.is_article() && self.location() != Location::Archive
    }

    pub fn display_title(&self) -> String {
        non_empty(self.title.as_deref())
            .unwrap_or(UNTITLED)
            .to_string()
    }

    pub fn source_label(&self) -> String {
        derive_source(self.site_name.as_deref(), self.source_url.as_deref())
    }

    /// Plain text for the first non-empty of content, body and notes.
    pub fn text(&self) -> String {
        if let Some(content) = non_empty(self.content.as_deref()) {
            return content.to_string();
        }
        if let Some(body) = non_empty(self.body.as_deref()) {
            let text = text::html_to_text(body);
            if !text.is_empty() {
                return text;
            }
        }
        non_empty(self.notes.as_deref())
            .map(str::to_string)
            .unwrap_or_default()
    }

    pub fn reader_url(&self) -> String {
        match non_empty(self.url.as_deref()) {
            Some(url) => url.to_string(),
            None => format!("{}/{}", READER_URL_BASE, self.id),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Human readable source label: the site name, else the URL host without a
/// leading `www.`, else a fixed placeholder.
pub fn derive_source(site_name: Option<&str>, source_url: Option<&str>) -> String {
    if let Some(name) = non_empty(site_name) {
        return name.to_string();
    }

    non_empty(source_url)
        .and_then(|raw| Url::parse(raw).ok())
        .and_then(|url| url.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

/// Fields the article store lets us change on a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ArticlePatch {
    pub fn move_to(location: Location) -> Self {
        Self {
            location: Some(location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub summary: String,
    pub content: String,
    pub url: String,
    pub source_url: Option<String>,
    pub word_count: u64,
    pub location: Location,
}

impl FeedItem {
    pub fn from_article(article: &Article, summary: String, max_content_chars: usize) -> Self {
        let text = article.text();
        let word_count = article
            .word_count
            .unwrap_or_else(|| text::count_words(&text) as u64);

        Self {
            id: article.id.clone(),
            title: article.display_title(),
            source: article.source_label(),
            summary,
            content: text::truncate_chars(&text, max_content_chars),
            url: article.reader_url(),
            source_url: article.source_url.clone(),
            word_count,
            location: article.location(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub articles: Vec<FeedItem>,
    pub total_available: usize,
    pub location: Scope,
}
