use std::time::Duration;

crate::config_group!({

    /// Base URL that relative container references are resolved against, e.g. the
    /// database server's host.
    ///
    /// Use the environment variable `CONTAINER_FIELD_REMOTE_BASE_URL` to set this value.
    ref base_url: Option<String> = None;

    /// User name sent with basic authentication when fetching container data.
    ///
    /// Use the environment variable `CONTAINER_FIELD_REMOTE_USERNAME` to set this value.
    ref username: Option<String> = None;

    /// Password sent with basic authentication when fetching container data.
    ///
    /// Use the environment variable `CONTAINER_FIELD_REMOTE_PASSWORD` to set this value.
    ref password: Option<String> = None;

    /// Timeout applied to a single fetch request.
    ///
    /// The default value is 60s.
    ///
    /// Use the environment variable `CONTAINER_FIELD_REMOTE_REQUEST_TIMEOUT` to set this value.
    ref request_timeout: Duration = Duration::from_secs(60);
});
