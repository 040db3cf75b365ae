use async_trait::async_trait;
use crate::types::{Article, ArticlePatch, Scope};
use crate::Result;

/// The read-it-later store the queue is pulled from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    fn name(&self) -> &str;

    /// Candidate articles for `scope`, most recently saved first.
    async fn list_candidates(&self, scope: Scope) -> Result<Vec<Article>>;

    /// Apply a partial update to an article.
    async fn mutate(&self, id: &str, patch: &ArticlePatch) -> Result<()>;

    /// Delete an article. Deleting something already gone succeeds.
    async fn remove(&self, id: &str) -> Result<()>;
}
