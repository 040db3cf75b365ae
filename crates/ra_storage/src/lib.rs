use std::sync::Arc;
use ra_core::{Error, KeyValueStore, Result};

pub mod backends;
pub mod markers;

pub use backends::*;
pub use markers::MarkerStore;

pub const DEFAULT_SQLITE_PATH: &str = "readaloud.db";

/// Open the store named by `kind` ("memory" or "sqlite").
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub async fn create_store(kind: &str, path: Option<&str>) -> Result<Arc<dyn KeyValueStore>> {
    match kind {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = std::path::PathBuf::from(path.unwrap_or(DEFAULT_SQLITE_PATH));
            Ok(Arc::new(SqliteStore::open(&path).await?))
        }
        other => Err(Error::Configuration(format!("Unsupported store backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::markers::MarkerStore;
    pub use ra_core::KeyValueStore;
}
