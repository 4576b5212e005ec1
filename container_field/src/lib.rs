//! A container field is a record attribute whose binary payload (an image, a document, ...) may
//! not be in memory yet. The payload is resolved on first access from the field's origin:
//! a reference into the remote database, a file on a named storage disk, a filesystem path,
//! or bytes already held in memory. Payloads fetched from (or uploaded to) the remote side can
//! be written through to a shared cache store keyed by the remote reference.
//!
//! Collaborators are reached through [`HostRecord`]: the cache configuration and store, the
//! remote fetcher, and the storage disks.

pub mod error;
mod field;
mod host;
pub mod mime;
mod origin;
pub mod storage;

pub use error::{ContainerFieldError, Result, StorageError};
pub use field::ContainerField;
pub use host::{HostRecord, RecordContext};
pub use origin::{DiskSource, MemorySource, Origin, OriginKind, PathSource, RemoteSource};
pub use storage::{DiskStore, LocalDisks};
