use std::path::PathBuf;

use payload_cache::error::PayloadCacheError;
use remote_client::RemoteClientError;
use thiserror::Error;

use crate::origin::OriginKind;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContainerFieldError {
    #[error("operation not supported for {0} origin")]
    UnsupportedOrigin(OriginKind),

    #[error("container field has no host record attached")]
    MissingHostRecord,

    #[error("Remote fetch error: {0}")]
    RemoteFetch(#[from] RemoteClientError),

    #[error("Storage read error: {0}")]
    StorageRead(#[from] StorageError),

    #[error("Cache error: {0}")]
    Cache(#[from] PayloadCacheError),
}

pub type Result<T> = std::result::Result<T, ContainerFieldError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("unknown storage disk {0:?}")]
    UnknownDisk(String),

    #[error("invalid filename {0:?}")]
    InvalidFilename(String),

    #[error("IO: {0}")]
    IO(#[from] std::io::Error),
}
