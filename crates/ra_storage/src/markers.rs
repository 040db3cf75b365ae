use chrono::Utc;
use ra_core::storage::{heard_key, later_key, HEARD_PREFIX, LATER_PREFIX};
use ra_core::{FeedConfig, KeyValueStore, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// The `heard:` and `later:` namespaces.
///
/// A heard marker hides an article from future syncs; a later marker brings
/// it back once, even if it was heard.
#[derive(Clone)]
pub struct MarkerStore {
    store: Arc<dyn KeyValueStore>,
    heard_ttl: Duration,
    later_ttl: Duration,
}

impl MarkerStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &FeedConfig) -> Self {
        Self {
            store,
            heard_ttl: config.heard_ttl,
            later_ttl: config.later_ttl,
        }
    }

    pub async fn mark_heard(&self, id: &str) -> Result<()> {
        self.store
            .put(&heard_key(id), &Utc::now().to_rfc3339(), Some(self.heard_ttl))
            .await
    }

    pub async fn mark_later(&self, id: &str) -> Result<()> {
        self.store
            .put(&later_key(id), &Utc::now().to_rfc3339(), Some(self.later_ttl))
            .await
    }

    pub async fn clear_heard(&self, id: &str) -> Result<()> {
        self.store.delete(&heard_key(id)).await
    }

    pub async fn clear_later(&self, id: &str) -> Result<()> {
        self.store.delete(&later_key(id)).await
    }

    pub async fn is_heard(&self, id: &str) -> Result<bool> {
        Ok(self.store.get(&heard_key(id)).await?.is_some())
    }

    pub async fn is_later(&self, id: &str) -> Result<bool> {
        Ok(self.store.get(&later_key(id)).await?.is_some())
    }

    pub async fn heard_ids(&self) -> Result<HashSet<String>> {
        self.store.scan_prefix(HEARD_PREFIX).await
    }

    pub async fn later_ids(&self) -> Result<HashSet<String>> {
        self.store.scan_prefix(LATER_PREFIX).await
    }
}
