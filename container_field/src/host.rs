use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use config::ContainerConfig;
use payload_cache::{cache_from_config, CacheStore};
use remote_client::{HttpFetcher, RemoteFetcher};
use tracing::info;

use crate::error::Result;
use crate::storage::{DiskStore, LocalDisks};

/// What a container field needs from the record that owns it.
pub trait HostRecord: Send + Sync {
    /// Seconds fetched or uploaded payloads stay cached. Zero or negative disables caching.
    fn container_cache_time(&self) -> i64;

    fn container_cache_store(&self) -> Option<Arc<dyn CacheStore>>;

    /// Fetch capability bound to the record's connection.
    fn remote_fetcher(&self) -> Arc<dyn RemoteFetcher>;

    fn disks(&self) -> Arc<dyn DiskStore>;
}

/// A ready-made [`HostRecord`] that hands out shared collaborators.
///
/// The cache time can be changed at any point; fields re-read it on every call.
pub struct RecordContext {
    cache_time: AtomicI64,
    cache_store: Option<Arc<dyn CacheStore>>,
    fetcher: Arc<dyn RemoteFetcher>,
    disks: Arc<dyn DiskStore>,
}

impl RecordContext {
    /// Context with caching switched off.
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, disks: Arc<dyn DiskStore>) -> Self {
        Self {
            cache_time: AtomicI64::new(0),
            cache_store: None,
            fetcher,
            disks,
        }
    }

    pub fn with_cache(mut self, store: Arc<dyn CacheStore>, cache_time_secs: i64) -> Self {
        self.cache_store = Some(store);
        self.cache_time = AtomicI64::new(cache_time_secs);
        self
    }

    pub fn set_cache_time(&self, cache_time_secs: i64) {
        self.cache_time.store(cache_time_secs, Ordering::Relaxed);
    }

    /// Builds the cache store, HTTP fetcher and local disks described by `config`.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::from_config(&config.remote)?);
        let disks = Arc::new(LocalDisks::from_config(&config.storage));
        let mut context = Self::new(fetcher, disks);

        if let Some(store) = cache_from_config(&config.cache)? {
            context = context.with_cache(store, config.cache.time_secs);
        }
        info!(
            cache_time_secs = context.container_cache_time(),
            cache_store = %config.cache.store,
            "container field context configured"
        );
        Ok(context)
    }
}

impl fmt::Debug for RecordContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordContext")
            .field("cache_time", &self.cache_time)
            .field("has_cache_store", &self.cache_store.is_some())
            .finish_non_exhaustive()
    }
}

impl HostRecord for RecordContext {
    fn container_cache_time(&self) -> i64 {
        self.cache_time.load(Ordering::Relaxed)
    }

    fn container_cache_store(&self) -> Option<Arc<dyn CacheStore>> {
        self.cache_store.clone()
    }

    fn remote_fetcher(&self) -> Arc<dyn RemoteFetcher> {
        self.fetcher.clone()
    }

    fn disks(&self) -> Arc<dyn DiskStore> {
        self.disks.clone()
    }
}
