use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::sync::OnceCell;

/// Tag of an [`Origin`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginKind {
    RemoteReference,
    DiskFile,
    FilesystemPath,
    InMemory,
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OriginKind::RemoteReference => "remote reference",
            OriginKind::DiskFile => "disk file",
            OriginKind::FilesystemPath => "filesystem path",
            OriginKind::InMemory => "in-memory",
        };
        f.write_str(name)
    }
}

/// Where a container field's payload comes from. Exactly one variant is active; each one carries
/// only the descriptors that make sense for it.
#[derive(Debug, Clone)]
pub enum Origin {
    RemoteReference(RemoteSource),
    DiskFile(DiskSource),
    FilesystemPath(PathSource),
    InMemory(MemorySource),
}

impl Origin {
    pub fn kind(&self) -> OriginKind {
        match self {
            Origin::RemoteReference(_) => OriginKind::RemoteReference,
            Origin::DiskFile(_) => OriginKind::DiskFile,
            Origin::FilesystemPath(_) => OriginKind::FilesystemPath,
            Origin::InMemory(_) => OriginKind::InMemory,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Origin::RemoteReference(s) => &s.filename,
            Origin::DiskFile(s) => &s.filename,
            Origin::FilesystemPath(s) => &s.filename,
            Origin::InMemory(s) => &s.filename,
        }
    }
}

/// Payload held by the remote system, located by an opaque reference (usually a URL).
#[derive(Debug, Clone)]
pub struct RemoteSource {
    pub(crate) filename: String,
    pub(crate) reference: Option<String>,
    /// Set at most once, on the first successful resolution.
    pub(crate) payload: OnceCell<Bytes>,
}

impl RemoteSource {
    /// An empty reference means the remote container holds nothing.
    pub(crate) fn new(filename: String, reference: String, payload: Option<Bytes>) -> Self {
        if reference.is_empty() {
            return Self {
                filename,
                reference: None,
                payload: OnceCell::new(),
            };
        }
        Self {
            filename,
            reference: Some(reference),
            payload: OnceCell::new_with(payload),
        }
    }

    pub(crate) fn from_reference(reference: String) -> Self {
        Self::new(filename_from_reference(&reference), reference, None)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The memoized payload, if it has been resolved.
    pub fn loaded_payload(&self) -> Option<&Bytes> {
        self.payload.get()
    }
}

/// A file on a named storage disk; `disk` of `None` selects the default disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSource {
    pub(crate) filename: String,
    pub(crate) disk: Option<String>,
}

impl DiskSource {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn disk(&self) -> Option<&str> {
        self.disk.as_deref()
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSource {
    pub(crate) filename: String,
    pub(crate) path: PathBuf,
}

impl PathSource {
    pub(crate) fn new(path: PathBuf, filename: Option<&str>) -> Self {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => filename_from_path(&path),
        };
        Self { filename, path }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Bytes staged in memory, e.g. a new upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    pub(crate) filename: String,
    pub(crate) data: Bytes,
}

impl MemorySource {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Last path segment of the reference, ignoring any query string.
pub(crate) fn filename_from_reference(reference: &str) -> String {
    let path = reference.split('?').next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string()
}

fn filename_from_path(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
