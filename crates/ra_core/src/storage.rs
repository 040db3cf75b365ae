use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use crate::Result;

pub const HEARD_PREFIX: &str = "heard:";
pub const LATER_PREFIX: &str = "later:";
pub const SUMMARY_PREFIX: &str = "summary:";

pub fn heard_key(id: &str) -> String {
    format!("{}{}", HEARD_PREFIX, id)
}

pub fn later_key(id: &str) -> String {
    format!("{}{}", LATER_PREFIX, id)
}

pub fn summary_key(id: &str) -> String {
    format!("{}{}", SUMMARY_PREFIX, id)
}

/// String key/value storage with optional per-entry expiry.
///
/// Each call is atomic on its own; sequences of calls are not.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl` when given.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Live keys starting with `prefix`, with the prefix stripped.
    async fn scan_prefix(&self, prefix: &str) -> Result<HashSet<String>>;
}
