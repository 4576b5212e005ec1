use std::env;
use std::ffi::OsStr;

/// Sets an environment variable for the lifetime of the guard and restores the previous value
/// (or removes the variable) on drop. Intended for tests; pair it with `serial_test` since the
/// process environment is shared.
pub struct EnvVarGuard {
    key: String,
    prev: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        let key = key.into();
        let prev = env::var(&key).ok();
        env::set_var(&key, value);
        Self { key, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => env::set_var(&self.key, v),
            None => env::remove_var(&self.key),
        }
    }
}
