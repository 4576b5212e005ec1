crate::config_group!({

    /// Seconds a container payload stays in the cache. Zero or negative disables caching.
    ///
    /// The default value is 0.
    ///
    /// Use the environment variable `CONTAINER_FIELD_CACHE_TIME_SECS` to set this value.
    ref time_secs: i64 = 0;

    /// Which cache store to build: "memory", "disk" or "none".
    ///
    /// The default value is "memory".
    ///
    /// Use the environment variable `CONTAINER_FIELD_CACHE_STORE` to set this value.
    ref store: String = "memory".to_string();

    /// Root directory of the disk cache store. Required when `store` is "disk".
    ///
    /// The default value is None.
    ///
    /// Use the environment variable `CONTAINER_FIELD_CACHE_DIR` to set this value.
    ref dir: Option<String> = None;
});
