use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use config::groups::storage::ConfigValueGroup as StorageConfigGroup;
use tracing::debug;

use crate::error::StorageError;

/// Named storage volumes that `DiskFile` fields read from.
#[async_trait]
pub trait DiskStore: Send + Sync {
    /// Read the whole of `filename` from `disk`, or from the default disk if `disk` is `None`.
    async fn read(&self, disk: Option<&str>, filename: &str) -> Result<Bytes, StorageError>;
}

/// Reads the full contents of a local file.
pub async fn read_path(path: &Path) -> Result<Bytes, StorageError> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Bytes::from(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Disks backed by directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDisks {
    default_disk: String,
    roots: HashMap<String, PathBuf>,
}

impl LocalDisks {
    pub fn new(default_disk: impl Into<String>) -> Self {
        Self {
            default_disk: default_disk.into(),
            roots: HashMap::new(),
        }
    }

    pub fn with_disk(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(name.into(), root.into());
        self
    }

    pub fn from_config(config: &StorageConfigGroup) -> Self {
        config
            .disk_roots()
            .into_iter()
            .fold(Self::new(config.default_disk.clone()), |disks, (name, root)| disks.with_disk(name, root))
    }

    pub fn default_disk(&self) -> &str {
        &self.default_disk
    }

    pub fn root(&self, disk: Option<&str>) -> Result<&Path, StorageError> {
        let name = disk.unwrap_or(&self.default_disk);
        self.roots
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| StorageError::UnknownDisk(name.to_string()))
    }

    /// Joins `filename` onto the disk root. Filenames are relative to the root and may not climb
    /// out of it.
    pub fn resolve(&self, disk: Option<&str>, filename: &str) -> Result<PathBuf, StorageError> {
        let root = self.root(disk)?;
        let relative = Path::new(filename);
        let is_contained = !filename.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_contained {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        Ok(root.join(relative))
    }
}

#[async_trait]
impl DiskStore for LocalDisks {
    async fn read(&self, disk: Option<&str>, filename: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(disk, filename)?;
        debug!("reading {filename} from disk {}", disk.unwrap_or(&self.default_disk));
        read_path(&path).await
    }
}
