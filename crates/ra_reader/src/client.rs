use async_trait::async_trait;
use ra_core::text::truncate_chars;
use ra_core::types::ARTICLE_CATEGORY;
use ra_core::{Article, ArticlePatch, ArticleSource, Error, ReaderConfig, Result, Scope};
use reqwest::header::{HeaderMap, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    results: Vec<Article>,
    #[serde(default)]
    next_page_cursor: Option<String>,
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

async fn upstream_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        truncate_chars(body.trim(), 300)
    };
    Error::Upstream {
        status: status.as_u16(),
        message,
    }
}

/// Client for the Readwise Reader v3 document API.
pub struct ReaderClient {
    client: Client,
    config: ReaderConfig,
}

impl ReaderClient {
    pub fn new(config: ReaderConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ReaderConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Configuration("Reader API token is not configured".to_string()))?;
        Ok(request.header(AUTHORIZATION, format!("Token {}", token)))
    }

    /// One list page, retrying the same cursor after 429 responses.
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ListResponse> {
        let mut retries = 0;
        loop {
            let mut request = self
                .authorized(self.client.get(self.url("list/")))?
                .query(&[("category", ARTICLE_CATEGORY), ("withHtmlContent", "true")]);
            if let Some(cursor) = cursor {
                request = request.query(&[("pageCursor", cursor)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retries >= self.config.max_retries {
                    return Err(Error::Upstream {
                        status: status.as_u16(),
                        message: format!("Rate limited after {} retries", retries),
                    });
                }
                retries += 1;
                let wait = retry_after(response.headers()).unwrap_or(self.config.default_retry_after);
                warn!(
                    "⏳ Reader rate limited, retrying in {}s ({}/{})",
                    wait.as_secs(),
                    retries,
                    self.config.max_retries
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                return Err(upstream_error(response).await);
            }

            return Ok(response.json::<ListResponse>().await?);
        }
    }
}

impl fmt::Debug for ReaderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ArticleSource for ReaderClient {
    fn name(&self) -> &str {
        "Readwise Reader"
    }

    async fn list_candidates(&self, scope: Scope) -> Result<Vec<Article>> {
        let mut candidates: Vec<Article> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        while pages < self.config.page_cap {
            if pages > 0 && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }

            let page = self.fetch_page(cursor.as_deref()).await?;
            pages += 1;

            let fetched = page.results.len();
            candidates.extend(
                page.results
                    .into_iter()
                    .filter(|article| article.is_candidate() && scope.includes(article.location())),
            );
            debug!("📄 Page {}: {} documents, {} candidates so far", pages, fetched, candidates.len());

            if candidates.len() >= self.config.max_results {
                candidates.truncate(self.config.max_results);
                break;
            }

            match page.next_page_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // Stable, so documents without a timestamp keep upstream order at the end.
        candidates.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

        info!(
            "📚 Fetched {} {} candidates in {} page(s)",
            candidates.len(),
            scope,
            pages
        );
        Ok(candidates)
    }

    async fn mutate(&self, id: &str, patch: &ArticlePatch) -> Result<()> {
        let response = self
            .authorized(self.client.patch(self.url(&format!("update/{}/", id))))?
            .json(patch)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        debug!("✏️ Updated {} upstream", id);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let response = self
            .authorized(self.client.delete(self.url(&format!("delete/{}/", id))))?
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("🗑️ {} was already gone upstream", id);
            return Ok(());
        }
        if !status.is_success() {
            return Err(upstream_error(response).await);
        }
        debug!("🗑️ Deleted {} upstream", id);
        Ok(())
    }
}
