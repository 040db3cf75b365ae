use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ra_core::{KeyValueStore, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

pub(crate) fn expiry_from(now: DateTime<Utc>, ttl: Option<Duration>) -> Option<DateTime<Utc>> {
    // A TTL too large to represent never expires.
    ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok())
        .and_then(|ttl| now.checked_add_signed(ttl))
}

/// Process-local store. Shares nothing across restarts, so it is meant for
/// tests and single-run CLI use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expiry_from(now, ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<HashSet<String>> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .filter_map(|(key, _)| key.strip_prefix(prefix).map(str::to_string))
            .collect())
    }
}
