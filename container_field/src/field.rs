use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use error_printer::{ErrorPrinter, OptionPrinter};
use payload_cache::CacheStore;
use tracing::debug;

use crate::error::{ContainerFieldError, Result};
use crate::host::HostRecord;
use crate::mime;
use crate::origin::{filename_from_reference, DiskSource, MemorySource, Origin, OriginKind, PathSource, RemoteSource};
use crate::storage::read_path;

/// A record attribute holding a binary payload that is resolved lazily from its [`Origin`].
///
/// Remote payloads are fetched at most once per instance, including under concurrent first
/// access, and are optionally read from and written to the host's cache store. Disk and path
/// payloads are read on every access; in-memory payloads are returned as held.
#[derive(Clone)]
pub struct ContainerField {
    key: Option<String>,
    host: Option<Arc<dyn HostRecord>>,
    origin: Origin,
}

impl ContainerField {
    fn with_origin(origin: Origin) -> Self {
        Self {
            key: None,
            host: None,
            origin,
        }
    }

    /// A field whose payload lives in the remote system at `reference`. An empty reference is an
    /// empty container.
    pub fn from_remote_reference(key: impl Into<String>, reference: impl Into<String>, host: Arc<dyn HostRecord>) -> Self {
        Self {
            key: Some(key.into()),
            host: Some(host),
            origin: Origin::RemoteReference(RemoteSource::from_reference(reference.into())),
        }
    }

    /// A file on a storage disk; `None` reads from the default disk.
    pub fn from_disk(filename: impl Into<String>, disk: Option<&str>) -> Self {
        Self::with_origin(Origin::DiskFile(DiskSource {
            filename: filename.into(),
            disk: disk.map(str::to_string),
        }))
    }

    /// A local file; the filename defaults to the last component of `path`.
    pub fn from_path(path: impl Into<PathBuf>, filename: Option<&str>) -> Self {
        Self::with_origin(Origin::FilesystemPath(PathSource::new(path.into(), filename)))
    }

    pub fn with_bytes(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::with_origin(Origin::InMemory(MemorySource {
            filename: filename.into(),
            data: data.into(),
        }))
    }

    pub fn set_from_remote_reference(&mut self, reference: impl Into<String>) -> &mut Self {
        self.origin = Origin::RemoteReference(RemoteSource::from_reference(reference.into()));
        self
    }

    pub fn set_from_disk(&mut self, filename: impl Into<String>, disk: Option<&str>) -> &mut Self {
        self.origin = Origin::DiskFile(DiskSource {
            filename: filename.into(),
            disk: disk.map(str::to_string),
        });
        self
    }

    pub fn set_from_path(&mut self, path: impl Into<PathBuf>, filename: Option<&str>) -> &mut Self {
        self.origin = Origin::FilesystemPath(PathSource::new(path.into(), filename));
        self
    }

    pub fn set_with_bytes(&mut self, filename: impl Into<String>, data: impl Into<Bytes>) -> &mut Self {
        self.origin = Origin::InMemory(MemorySource {
            filename: filename.into(),
            data: data.into(),
        });
        self
    }

    /// Name of the attribute on the host record.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.set_key(key);
        self
    }

    pub fn host(&self) -> Option<&Arc<dyn HostRecord>> {
        self.host.as_ref()
    }

    pub fn set_host(&mut self, host: Arc<dyn HostRecord>) -> &mut Self {
        self.host = Some(host);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostRecord>) -> Self {
        self.set_host(host);
        self
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    pub fn filename(&self) -> &str {
        self.origin.filename()
    }

    pub fn mime_type(&self) -> &'static str {
        mime::detect_by_filename(self.filename())
    }

    /// True only for a remote field with no reference recorded. A field with any other origin
    /// counts as filled, even if its payload turns out to be zero bytes.
    pub fn is_empty(&self) -> bool {
        match &self.origin {
            Origin::RemoteReference(source) => source.reference().is_none(),
            _ => false,
        }
    }

    /// The remote reference, when there is one. Fields from other origins have no cache identity.
    pub fn cache_key(&self) -> Option<&str> {
        match &self.origin {
            Origin::RemoteReference(source) => source.reference(),
            _ => None,
        }
    }

    /// Whether payloads of this field go through the cache right now. Re-evaluated on every call.
    pub fn is_cachable(&self) -> bool {
        self.cache_key().is_some() && self.cache_target().is_some()
    }

    pub fn has_loaded_remote_payload(&self) -> bool {
        match &self.origin {
            Origin::RemoteReference(source) => source.loaded_payload().is_some(),
            _ => false,
        }
    }

    /// Resolves the payload. `Ok(None)` means the remote container is empty.
    pub async fn payload(&self) -> Result<Option<Bytes>> {
        match &self.origin {
            Origin::RemoteReference(source) => {
                let Some(reference) = source.reference() else {
                    return Ok(None);
                };
                // Set only by the caller that fetched; that caller writes the cache after memoizing.
                let mut pending_put = None;
                let pending_slot = &mut pending_put;
                let data = source
                    .payload
                    .get_or_try_init(|| async move {
                        let (data, cache_miss) = self.resolve_remote(reference).await?;
                        *pending_slot = cache_miss.map(|target| (target, data.clone()));
                        Ok::<_, ContainerFieldError>(data)
                    })
                    .await?
                    .clone();

                if let Some(((store, ttl), fetched)) = pending_put {
                    store
                        .put(reference, fetched, ttl)
                        .await
                        .log_error(format!("writing container payload for {reference} to cache"))?;
                }
                Ok(Some(data))
            },
            Origin::FilesystemPath(source) => Ok(Some(read_path(&source.path).await?)),
            Origin::DiskFile(source) => {
                let disks = self.require_host()?.disks();
                Ok(Some(disks.read(source.disk(), &source.filename).await?))
            },
            Origin::InMemory(source) => Ok(Some(source.data.clone())),
        }
    }

    /// Fetches and memoizes the remote payload without consulting the cache. A payload that is
    /// already loaded is returned as is.
    pub async fn load_remote_payload(&self) -> Result<Option<Bytes>> {
        let Origin::RemoteReference(source) = &self.origin else {
            return Err(ContainerFieldError::UnsupportedOrigin(self.origin_kind()));
        };
        let Some(reference) = source.reference() else {
            return Ok(None);
        };
        let data = source
            .payload
            .get_or_try_init(|| async {
                let host = self.require_host()?;
                fetch_remote(host.as_ref(), reference).await
            })
            .await?;
        Ok(Some(data.clone()))
    }

    /// Records that the field's payload now lives in the remote system at `reference`.
    ///
    /// The field becomes a remote field. Bytes already at hand (staged in memory or previously
    /// loaded) are kept as the loaded payload, and if caching applies they are written to the
    /// cache under the new reference so the next read needs no fetch.
    pub async fn record_remote_save(&mut self, reference: impl Into<String>) -> Result<()> {
        let reference = reference.into();
        let caching = !reference.is_empty() && self.cache_target().is_some();

        let (payload, local_read) = match &self.origin {
            Origin::RemoteReference(source) => (source.loaded_payload().cloned(), Ok(())),
            Origin::InMemory(source) => (Some(source.data.clone()), Ok(())),
            Origin::DiskFile(_) | Origin::FilesystemPath(_) if caching => {
                match self.materialize().await.warn_error("reading saved payload for the cache") {
                    Ok(data) => (data, Ok(())),
                    Err(e) => (None, Err(e)),
                }
            },
            Origin::DiskFile(_) | Origin::FilesystemPath(_) => (None, Ok(())),
        };

        let filename = match self.filename() {
            "" => filename_from_reference(&reference),
            name => name.to_string(),
        };
        debug!(key = ?self.key, reference = %reference, "recording remote save");
        self.origin = Origin::RemoteReference(RemoteSource::new(filename, reference, payload));

        // The reference is recorded even when the local copy could not be read.
        local_read?;
        if self.is_cachable() {
            self.save_to_cache().await?;
        }
        Ok(())
    }

    /// Writes the field's current bytes to the cache under its cache key.
    pub(crate) async fn save_to_cache(&self) -> Result<()> {
        let Some(key) = self.cache_key() else {
            return Err(ContainerFieldError::UnsupportedOrigin(self.origin_kind()));
        };
        let Some((store, ttl)) = self.cache_target() else {
            return Ok(());
        };
        let Some(data) = self
            .materialize()
            .await?
            .debug_none(format!("no payload at hand to cache for {key}"))
        else {
            return Ok(());
        };
        store
            .put(key, data, ttl)
            .await
            .log_error(format!("writing container payload for {key} to cache"))?;
        Ok(())
    }

    /// The bytes the current origin holds, without fetching anything remote.
    async fn materialize(&self) -> Result<Option<Bytes>> {
        match &self.origin {
            Origin::RemoteReference(source) => Ok(source.loaded_payload().cloned()),
            Origin::InMemory(source) => Ok(Some(source.data.clone())),
            Origin::FilesystemPath(_) | Origin::DiskFile(_) => self.payload().await,
        }
    }

    /// Reads the payload from the cache or the remote side. On a cache miss the cache to write the
    /// fetched bytes to is returned alongside them.
    async fn resolve_remote(&self, reference: &str) -> Result<(Bytes, Option<CacheTarget>)> {
        let host = self.require_host()?;
        let Some((store, ttl)) = caching_for(host.as_ref()) else {
            return Ok((fetch_remote(host.as_ref(), reference).await?, None));
        };

        if store.has(reference).await? {
            if let Some(data) = store.get(reference).await? {
                debug!(reference, "container payload served from cache");
                return Ok((data, None));
            }
        }

        debug!(reference, "container payload not cached");
        let data = fetch_remote(host.as_ref(), reference).await?;
        Ok((data, Some((store, ttl))))
    }

    fn cache_target(&self) -> Option<CacheTarget> {
        caching_for(self.host.as_ref()?.as_ref())
    }

    fn require_host(&self) -> Result<&Arc<dyn HostRecord>> {
        self.host.as_ref().ok_or(ContainerFieldError::MissingHostRecord)
    }
}

type CacheTarget = (Arc<dyn CacheStore>, Duration);

/// The host's cache store and entry lifetime, if caching is switched on.
fn caching_for(host: &dyn HostRecord) -> Option<CacheTarget> {
    let secs = u64::try_from(host.container_cache_time()).ok().filter(|s| *s > 0)?;
    let store = host.container_cache_store()?;
    Some((store, Duration::from_secs(secs)))
}

async fn fetch_remote(host: &dyn HostRecord, reference: &str) -> Result<Bytes> {
    debug!(reference, "fetching container payload from remote");
    let data = host
        .remote_fetcher()
        .fetch(reference)
        .await
        .warn_error(format!("fetching container payload {reference}"))?;
    Ok(data)
}

impl fmt::Debug for ContainerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerField")
            .field("key", &self.key)
            .field("has_host", &self.host.is_some())
            .field("origin", &self.origin)
            .finish()
    }
}
