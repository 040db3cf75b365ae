use ra_core::storage::summary_key;
use ra_core::{Article, KeyValueStore, Result, Summarizer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Read-through cache of summaries keyed by article id.
///
/// A cached summary is returned verbatim until the store expires it.
/// Concurrent misses for the same id are not coalesced.
#[derive(Clone)]
pub struct SummaryCache {
    store: Arc<dyn KeyValueStore>,
    summarizer: Arc<dyn Summarizer>,
    ttl: Duration,
}

impl SummaryCache {
    pub fn new(store: Arc<dyn KeyValueStore>, summarizer: Arc<dyn Summarizer>, ttl: Duration) -> Self {
        Self {
            store,
            summarizer,
            ttl,
        }
    }

    pub fn summarizer_name(&self) -> &str {
        self.summarizer.name()
    }

    pub async fn get_or_create(&self, article: &Article) -> Result<String> {
        let key = summary_key(&article.id);
        if let Some(summary) = self.store.get(&key).await? {
            debug!("📦 Summary cache hit for {}", article.id);
            return Ok(summary);
        }

        debug!("🤖 Generating summary for {} with {}", article.id, self.summarizer.name());
        let summary = self.summarizer.summarize(article).await?;

        if let Err(e) = self.store.put(&key, &summary, Some(self.ttl)).await {
            warn!("⚠️ Failed to cache summary for {}: {}", article.id, e);
        }
        Ok(summary)
    }
}
