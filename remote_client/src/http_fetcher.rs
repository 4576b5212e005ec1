use async_trait::async_trait;
use bytes::Bytes;
use config::groups::remote::ConfigValueGroup as RemoteConfigGroup;
use error_printer::ErrorPrinter;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;
use url::Url;

use crate::error::{RemoteClientError, Result};
use crate::http_client::{build_http_client, BasicAuth};
use crate::interface::RemoteFetcher;

/// Fetches container data over HTTP(S).
///
/// References are usually server-relative paths with a query string (the remote system hands out
/// `/path/to/file.jpg?-db=...` style locators); those are resolved against `base_url`. Absolute
/// references are used as given.
#[derive(Debug)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
    base_url: Option<Url>,
}

impl HttpFetcher {
    pub fn new(client: ClientWithMiddleware, base_url: Option<Url>) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(config: &RemoteConfigGroup) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| RemoteClientError::ConfigurationError(format!("invalid base url: {e}")))?;

        let auth = match (&config.username, &config.password) {
            (Some(username), password) => Some(BasicAuth {
                username: username.clone(),
                password: password.clone().unwrap_or_default(),
            }),
            (None, _) => None,
        };

        let client = build_http_client(auth.as_ref(), config.request_timeout)?;
        Ok(Self::new(client, base_url))
    }

    pub fn resolve(&self, reference: &str) -> Result<Url> {
        let invalid = |source| RemoteClientError::InvalidReference {
            reference: reference.to_string(),
            source,
        };
        match Url::parse(reference) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(reference).map_err(invalid),
                None => Err(invalid(url::ParseError::RelativeUrlWithoutBase)),
            },
            Err(e) => Err(invalid(e)),
        }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, reference: &str) -> Result<Bytes> {
        let url = self.resolve(reference)?;
        debug!("fetching container data from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .info_error(format!("error requesting container data {reference}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteClientError::Status {
                status,
                reference: reference.to_string(),
            });
        }

        Ok(response.bytes().await?)
    }
}
