mod disk;
pub mod error;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use config::groups::cache::ConfigValueGroup as CacheConfigGroup;
pub use disk::DiskCacheStore;
use error::PayloadCacheError;
pub use memory::MemoryCacheStore;
use tracing::info;

/// Longest lifetime an entry is given; longer TTLs are capped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A key/value store for container payloads. Keys are opaque strings; entries expire after the
/// duration given to `put`. Implementations are shared between many fields and must tolerate
/// concurrent writers to the same key (last write wins).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn has(&self, key: &str) -> Result<bool, PayloadCacheError>;

    /// Returns `None` if the entry is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, PayloadCacheError>;

    /// A zero `ttl` stores nothing; anything above [`MAX_TTL`] is capped.
    async fn put(&self, key: &str, data: Bytes, ttl: Duration) -> Result<(), PayloadCacheError>;
}

/// Builds the cache store selected by the `cache` config group, or `None` if caching is switched off.
pub fn cache_from_config(config: &CacheConfigGroup) -> Result<Option<Arc<dyn CacheStore>>, PayloadCacheError> {
    match config.store.trim().to_ascii_lowercase().as_str() {
        "none" | "" => Ok(None),
        "memory" => Ok(Some(Arc::new(MemoryCacheStore::default()))),
        "disk" => {
            let Some(dir) = config.dir.as_ref() else {
                return Err(PayloadCacheError::Configuration("disk cache store requires a cache dir".to_string()));
            };
            info!("using disk cache store at {dir}");
            Ok(Some(Arc::new(DiskCacheStore::initialize(dir)?)))
        },
        other => Err(PayloadCacheError::Configuration(format!("unknown cache store {other:?}"))),
    }
}
