use std::time::Duration;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use error_printer::OptionPrinter;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};

use crate::error::{RemoteClientError, Result};

/// User name and password for the remote system.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Builds the client used to fetch container data. Credentials, when given, are attached to
/// every request by [`BasicAuthMiddleware`].
pub fn build_http_client(auth: Option<&BasicAuth>, timeout: Duration) -> Result<ClientWithMiddleware> {
    let auth_middleware = auth
        .map(BasicAuthMiddleware::try_from)
        .transpose()?
        .info_none("remote auth disabled");
    let reqwest_client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(ClientBuilder::new(reqwest_client).maybe_with(auth_middleware).build())
}

/// Helper trait to allow the reqwest_middleware client to optionally add a middleware.
trait OptionalMiddleware {
    fn maybe_with<M: Middleware>(self, middleware: Option<M>) -> Self;
}

impl OptionalMiddleware for ClientBuilder {
    fn maybe_with<M: Middleware>(self, middleware: Option<M>) -> Self {
        match middleware {
            Some(m) => self.with(m),
            None => self,
        }
    }
}

/// Adds an `Authorization: Basic ...` header to outbound requests.
pub struct BasicAuthMiddleware {
    header: HeaderValue,
}

impl TryFrom<&BasicAuth> for BasicAuthMiddleware {
    type Error = RemoteClientError;

    fn try_from(auth: &BasicAuth) -> Result<Self> {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", auth.username, auth.password));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| RemoteClientError::ConfigurationError(format!("invalid credentials: {e}")))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }
}

#[async_trait::async_trait]
impl Middleware for BasicAuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        req.headers_mut().insert(AUTHORIZATION, self.header.clone());
        next.run(req, extensions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        let middleware = BasicAuthMiddleware::try_from(&auth).unwrap();
        assert_eq!(middleware.header.to_str().unwrap(), "Basic dXNlcjpwYXNz");
        assert!(middleware.header.is_sensitive());
    }

    #[test]
    fn test_debug_redacts_password() {
        let auth = BasicAuth {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{auth:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }
}
