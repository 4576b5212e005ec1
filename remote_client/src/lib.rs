pub use crate::error::RemoteClientError;
pub use http_client::{build_http_client, BasicAuth, BasicAuthMiddleware};
pub use http_fetcher::HttpFetcher;
pub use interface::RemoteFetcher;

pub mod error;
mod http_client;
mod http_fetcher;
mod interface;
