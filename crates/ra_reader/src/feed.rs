use ra_core::{Article, ArticleSource, Config, FeedItem, FeedResponse, Result, Scope};
use ra_inference::SummaryCache;
use ra_storage::MarkerStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the listening queue: upstream candidates, minus what has been
/// heard (unless deferred), capped and summarized.
#[derive(Clone)]
pub struct FeedAssembler {
    source: Arc<dyn ArticleSource>,
    markers: MarkerStore,
    cache: SummaryCache,
    max_items: usize,
    max_content_chars: usize,
}

/// Keep an article unless it was heard and not deferred since.
fn is_due(article: &Article, heard: &HashSet<String>, later: &HashSet<String>) -> bool {
    !heard.contains(&article.id) || later.contains(&article.id)
}

impl FeedAssembler {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        markers: MarkerStore,
        cache: SummaryCache,
        config: &Config,
    ) -> Self {
        Self {
            source,
            markers,
            cache,
            max_items: config.feed.max_items,
            max_content_chars: config.summarizer.max_input_chars,
        }
    }

    pub async fn assemble(&self, scope: Scope) -> Result<FeedResponse> {
        info!("🔄 Syncing {} scope from {}", scope, self.source.name());
        let candidates = self.source.list_candidates(scope).await?;

        let heard = self.markers.heard_ids().await?;
        let later = self.markers.later_ids().await?;

        let due: Vec<Article> = candidates
            .into_iter()
            .filter(|article| article.is_candidate() && scope.includes(article.location()))
            .filter(|article| is_due(article, &heard, &later))
            .collect();
        let total_available = due.len();

        let selected: Vec<Article> = due.into_iter().take(self.max_items).collect();
        let outcomes = self.summarize_each(&selected).await?;

        let mut articles = Vec::with_capacity(outcomes.len());
        for (article, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Ok(item) => articles.push(item),
                Err(e) => warn!("⚠️ Skipping {} ({}): {}", article.id, article.display_title(), e),
            }
        }

        self.consume_deferrals(&articles, &later).await;

        info!(
            "✨ Feed ready: {} of {} available articles ({} scope)",
            articles.len(),
            total_available,
            scope
        );
        Ok(FeedResponse {
            articles,
            total_available,
            location: scope,
        })
    }

    /// Summaries for `articles`, one outcome per article, in order.
    ///
    /// Articles are processed one at a time. A per-article failure is kept as
    /// an `Err` entry; only configuration errors abort the whole pass.
    async fn summarize_each(&self, articles: &[Article]) -> Result<Vec<Result<FeedItem>>> {
        let mut outcomes = Vec::with_capacity(articles.len());
        for article in articles {
            let outcome = match self.cache.get_or_create(article).await {
                Ok(summary) => Ok(FeedItem::from_article(article, summary, self.max_content_chars)),
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => Err(e),
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// A deferral is spent once the article has been served again.
    async fn consume_deferrals(&self, served: &[FeedItem], later: &HashSet<String>) {
        for item in served.iter().filter(|item| later.contains(&item.id)) {
            if let Err(e) = self.markers.clear_later(&item.id).await {
                warn!("⚠️ Failed to clear later marker for {}: {}", item.id, e);
            }
        }
    }
}
