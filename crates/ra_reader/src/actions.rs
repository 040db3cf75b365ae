use ra_core::{ArticlePatch, ArticleSource, Error, Location, Result};
use ra_storage::MarkerStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_ID_LEN: usize = 128;

/// What the listener decided to do with an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Archive,
    Delete,
    Later,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Archive => "archive",
            Action::Delete => "delete",
            Action::Later => "later",
        };
        f.write_str(name)
    }
}

/// Ids are interpolated into upstream URL paths.
fn validate_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("Article id is required".to_string()));
    }
    if id.len() > MAX_ID_LEN
        || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::InvalidInput(format!("Invalid article id: {}", id)));
    }
    Ok(id)
}

/// Applies listener actions to local markers and the article store.
///
/// The local marker is always written before the upstream call and is left
/// in place if that call fails, so a handled article does not come back.
#[derive(Clone)]
pub struct ActionReconciler {
    source: Arc<dyn ArticleSource>,
    markers: MarkerStore,
}

impl ActionReconciler {
    pub fn new(source: Arc<dyn ArticleSource>, markers: MarkerStore) -> Self {
        Self { source, markers }
    }

    pub async fn apply(&self, action: Action, id: &str) -> Result<()> {
        match action {
            Action::Archive => self.archive(id).await,
            Action::Delete => self.delete(id).await,
            Action::Later => self.defer(id).await,
        }
    }

    /// Record `id` as handled: heard, and no longer deferred.
    async fn mark_handled(&self, id: &str) -> Result<()> {
        self.markers.mark_heard(id).await?;
        self.markers.clear_later(id).await
    }

    pub async fn archive(&self, id: &str) -> Result<()> {
        let id = validate_id(id)?;
        self.mark_handled(id).await?;

        self.source
            .mutate(id, &ArticlePatch::move_to(Location::Archive))
            .await
            .map_err(|e| {
                warn!("⚠️ Archived {} locally but upstream update failed: {}", id, e);
                e
            })?;
        info!("📥 Archived {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = validate_id(id)?;
        self.mark_handled(id).await?;

        match self.source.remove(id).await {
            Ok(()) | Err(Error::NotFound(_)) => {
                info!("🗑️ Deleted {}", id);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Hid {} locally but upstream delete failed: {}", id, e);
                Err(e)
            }
        }
    }

    /// Bring an article back on the next sync, even if it was heard.
    pub async fn defer(&self, id: &str) -> Result<()> {
        let id = validate_id(id)?;
        self.markers.mark_later(id).await?;
        self.markers.clear_heard(id).await?;
        info!("⏰ Deferred {}", id);
        Ok(())
    }
}
