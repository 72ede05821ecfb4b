//! Shared Cache Handle
//!
//! Async, cloneable front for [`CacheStore`] with JSON-typed accessors used
//! by the services.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheError;

// == Shared Cache ==
/// Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<RwLock<CacheStore>>,
}

impl SharedCache {
    pub fn new(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with_capacity(max_entries: usize, default_ttl: u64) -> Self {
        Self::new(CacheStore::new(max_entries, default_ttl))
    }

    // == Raw Access ==
    /// Write lock even for reads: a hit updates LRU order and stats.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.write().await.get(key)
    }

    pub async fn set(&self, key: &str, value: String, ttl: Option<u64>) -> Result<(), CacheError> {
        self.inner.write().await.set(key.to_string(), value, ttl)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    pub async fn delete_prefix(&self, prefix: &str) -> usize {
        self.inner.write().await.delete_prefix(prefix)
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    // == Typed Access ==
    /// Reads and decodes a JSON value. An undecodable entry is discarded and
    /// reported as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Dropping undecodable cache entry {}: {}", key, e);
                self.delete(key).await;
                None
            }
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw, ttl).await
    }
}
