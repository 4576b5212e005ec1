use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::PayloadCacheError;
use crate::{CacheStore, MAX_TTL};

#[derive(Debug, Clone)]
struct MemoryCacheItem {
    data: Bytes,
    expires_at: Instant,
}

impl MemoryCacheItem {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct CacheState {
    inner: HashMap<String, MemoryCacheItem>,
    total_bytes: u64,
}

impl CacheState {
    fn remove(&mut self, key: &str) {
        if let Some(item) = self.inner.remove(key) {
            self.total_bytes -= item.data.len() as u64;
        }
    }
}

/// MemoryCacheStore is a CacheStore implementor that keeps payloads in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    state: Arc<RwLock<CacheState>>,
}

impl MemoryCacheStore {
    pub async fn num_items(&self) -> usize {
        self.state.read().await.inner.len()
    }

    pub async fn total_bytes(&self) -> u64 {
        self.state.read().await.total_bytes
    }

    /// Remove the entry if it has expired; returns the live entry otherwise.
    async fn live_item(&self, key: &str) -> Option<MemoryCacheItem> {
        let now = Instant::now();
        {
            let state = self.state.read().await;
            match state.inner.get(key) {
                None => return None,
                Some(item) if item.is_live(now) => return Some(item.clone()),
                Some(_) => {},
            }
        }

        let mut state = self.state.write().await;
        // Recheck under the write lock, a writer may have refreshed it.
        match state.inner.get(key) {
            Some(item) if item.is_live(now) => Some(item.clone()),
            Some(_) => {
                state.remove(key);
                None
            },
            None => None,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn has(&self, key: &str) -> Result<bool, PayloadCacheError> {
        Ok(self.live_item(key).await.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, PayloadCacheError> {
        Ok(self.live_item(key).await.map(|item| item.data))
    }

    async fn put(&self, key: &str, data: Bytes, ttl: Duration) -> Result<(), PayloadCacheError> {
        let mut state = self.state.write().await;
        state.remove(key);

        // A zero ttl would be expired on arrival.
        if ttl.is_zero() {
            return Ok(());
        }

        state.total_bytes += data.len() as u64;
        let item = MemoryCacheItem {
            data,
            expires_at: Instant::now() + ttl.min(MAX_TTL),
        };
        state.inner.insert(key.to_string(), item);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "/fmi/xml/cnt/photo.jpg?-db=Assets&-lay=web&-recid=7&-field=photo(1)";

    #[tokio::test]
    async fn test_memory_cache_basic() {
        let cache = MemoryCacheStore::default();
        assert!(!cache.has(KEY).await.unwrap());
        assert!(cache.get(KEY).await.unwrap().is_none());

        let data = Bytes::from(vec![7u8; 1000]);
        cache.put(KEY, data.clone(), Duration::from_secs(60)).await.unwrap();

        assert!(cache.has(KEY).await.unwrap());
        assert_eq!(cache.get(KEY).await.unwrap(), Some(data));
        assert_eq!(cache.num_items().await, 1);
        assert_eq!(cache.total_bytes().await, 1000);
    }

    #[tokio::test]
    async fn test_memory_cache_overwrite() {
        let cache = MemoryCacheStore::default();
        cache.put(KEY, Bytes::from_static(b"first"), Duration::from_secs(60)).await.unwrap();
        cache.put(KEY, Bytes::from_static(b"second!"), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get(KEY).await.unwrap(), Some(Bytes::from_static(b"second!")));
        assert_eq!(cache.num_items().await, 1);
        assert_eq!(cache.total_bytes().await, 7);
    }

    #[tokio::test]
    async fn test_memory_cache_zero_ttl_stores_nothing() {
        let cache = MemoryCacheStore::default();
        cache.put(KEY, Bytes::from_static(b"data"), Duration::ZERO).await.unwrap();
        assert!(!cache.has(KEY).await.unwrap());
        assert_eq!(cache.num_items().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_expiry() {
        let cache = MemoryCacheStore::default();
        cache.put(KEY, Bytes::from_static(b"data"), Duration::from_secs(30)).await.unwrap();

        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(cache.has(KEY).await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!cache.has(KEY).await.unwrap());
        assert!(cache.get(KEY).await.unwrap().is_none());
        assert_eq!(cache.num_items().await, 0);
        assert_eq!(cache.total_bytes().await, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_huge_ttl_is_capped() {
        let cache = MemoryCacheStore::default();
        cache.put(KEY, Bytes::from_static(b"data"), Duration::MAX).await.unwrap();
        cache.put("other", Bytes::from_static(b"data"), Duration::from_secs(i64::MAX as u64)).await.unwrap();
        assert!(cache.has(KEY).await.unwrap());
        assert!(cache.has("other").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_cache_clones_share_state() {
        let cache = MemoryCacheStore::default();
        let other = cache.clone();
        cache.put(KEY, Bytes::from_static(b"shared"), Duration::from_secs(60)).await.unwrap();
        assert_eq!(other.get(KEY).await.unwrap(), Some(Bytes::from_static(b"shared")));
    }
}
