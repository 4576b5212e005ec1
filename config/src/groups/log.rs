crate::config_group!({

    /// The log destination. If this path exists as a directory or ends with a /, a new log file is
    /// created in that directory; otherwise the path names the log file.
    ///
    /// If given but empty, logs go to the console. The default value is None (console).
    ///
    /// Use the environment variable `CONTAINER_FIELD_LOG_DEST` to set this value.
    ref dest: Option<String> = None;

    /// "json" dumps log events as json blobs, anything else as text. By default files get json and
    /// the console gets text.
    ///
    /// Use the environment variable `CONTAINER_FIELD_LOG_FORMAT` to set this value.
    ref format: Option<String> = None;

    /// Base name for log files written into a directory; timestamp and pid are appended.
    ///
    /// The default value is "container_field".
    ///
    /// Use the environment variable `CONTAINER_FIELD_LOG_PREFIX` to set this value.
    ref prefix: String = "container_field".to_string();
});
