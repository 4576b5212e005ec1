use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use bytes::Bytes;
use entry_header::EntryHeader;
use error_printer::ErrorPrinter;
use tracing::{debug, warn};

use crate::error::PayloadCacheError;
use crate::{CacheStore, MAX_TTL};

mod entry_header;

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// DiskCacheStore keeps one file per key under `cache_root`. Files are named by the blake3 digest
/// of the key, so arbitrary references (long URLs with query strings) map to valid file names.
#[derive(Debug, Clone)]
pub struct DiskCacheStore {
    cache_root: PathBuf,
}

impl DiskCacheStore {
    pub fn initialize<T: Into<PathBuf>>(cache_root: T) -> Result<Self, PayloadCacheError> {
        let cache_root = cache_root.into();
        std::fs::create_dir_all(&cache_root)?;
        Ok(Self { cache_root })
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_root.join(blake3::hash(key.as_bytes()).to_hex().as_str())
    }

    /// Reads and validates the entry for `key`. Expired entries are deleted and read as missing;
    /// entries that fail validation are deleted and reported as corrupt.
    async fn read_entry(&self, key: &str) -> Result<Option<Bytes>, PayloadCacheError> {
        let path = self.entry_path(key);
        let buf = match tokio::fs::read(&path).await {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let validated = validate_entry(key, &buf);
        match validated {
            Ok(Some(payload)) => Ok(Some(Bytes::copy_from_slice(payload))),
            Ok(None) => {
                debug!("cache entry for {key} expired");
                remove_if_exists(&path).await?;
                Ok(None)
            },
            Err(e) => {
                warn!("removing corrupt cache entry {path:?}");
                remove_if_exists(&path).await?;
                Err(e)
            },
        }
    }

    async fn put_with_expiry(&self, key: &str, data: &[u8], expires_at: SystemTime) -> Result<(), PayloadCacheError> {
        let header = EntryHeader::new(key, expires_at, data);
        let mut buf = Vec::with_capacity(data.len() + key.len() + 64);
        header.serialize(&mut buf);
        buf.extend_from_slice(data);

        // Write then rename so readers never observe a partially written entry.
        let path = self.entry_path(key);
        let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.{counter}.tmp", std::process::id()));
        tokio::fs::write(&temp_path, &buf).await?;
        let renamed = tokio::fs::rename(&temp_path, &path)
            .await
            .log_error(format!("moving cache entry into place at {path:?}"));
        if renamed.is_err() {
            let _ = remove_if_exists(&temp_path)
                .await
                .warn_error(format!("removing temporary cache file {temp_path:?}"));
        }
        Ok(renamed?)
    }
}

fn validate_entry<'a>(key: &str, buf: &'a [u8]) -> Result<Option<&'a [u8]>, PayloadCacheError> {
    let (header, payload) = EntryHeader::deserialize(buf)?;
    if header.key != key {
        return Err(PayloadCacheError::corrupt(format!("entry belongs to key {:?}", header.key)));
    }
    if header.is_expired(SystemTime::now()) {
        return Ok(None);
    }
    if blake3::hash(payload) != header.hash {
        return Err(PayloadCacheError::corrupt("payload checksum mismatch"));
    }
    Ok(Some(payload))
}

async fn remove_if_exists(path: &Path) -> Result<(), PayloadCacheError> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[async_trait]
impl CacheStore for DiskCacheStore {
    async fn has(&self, key: &str) -> Result<bool, PayloadCacheError> {
        Ok(self.read_entry(key).await?.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, PayloadCacheError> {
        self.read_entry(key).await
    }

    async fn put(&self, key: &str, data: Bytes, ttl: Duration) -> Result<(), PayloadCacheError> {
        if ttl.is_zero() {
            remove_if_exists(&self.entry_path(key)).await?;
            return Ok(());
        }
        self.put_with_expiry(key, &data, SystemTime::now() + ttl.min(MAX_TTL)).await
    }
}
