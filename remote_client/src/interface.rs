use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Fetches the payload behind a container reference from the remote system.
///
/// A failed fetch is returned as is; implementations do not retry.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Bytes>;
}
