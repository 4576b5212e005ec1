crate::config_group!({

    /// Disk used when a field is sourced from storage without naming one.
    ///
    /// The default value is "local".
    ///
    /// Use the environment variable `CONTAINER_FIELD_STORAGE_DEFAULT_DISK` to set this value.
    ref default_disk: String = "local".to_string();

    /// Comma separated `name=root_directory` pairs, one per disk.
    ///
    /// The default value is "local=storage".
    ///
    /// Use the environment variable `CONTAINER_FIELD_STORAGE_DISKS` to set this value.
    ref disks: String = "local=storage".to_string();
});

impl ConfigValueGroup {
    /// The `disks` value split into `(name, root)` pairs. Malformed entries are skipped.
    pub fn disk_roots(&self) -> Vec<(String, String)> {
        self.disks
            .split(',')
            .filter_map(|entry| {
                let (name, root) = entry.split_once('=')?;
                let (name, root) = (name.trim(), root.trim());
                if name.is_empty() || root.is_empty() {
                    tracing::warn!("ignoring malformed disk entry {entry:?}");
                    return None;
                }
                Some((name.to_string(), root.to_string()))
            })
            .collect()
    }
}
