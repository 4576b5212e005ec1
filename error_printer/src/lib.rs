use std::fmt::{Debug, Display};
use std::panic::Location;

use tracing::{debug, error, info, warn};

/// Extension methods on `Result` that log the error through `tracing` and hand the result back
/// unchanged, so the caller can keep propagating it with `?`.
pub trait ErrorPrinter {
    fn log_error<M: Display>(self, message: M) -> Self;

    fn warn_error<M: Display>(self, message: M) -> Self;

    fn info_error<M: Display>(self, message: M) -> Self;

    fn debug_error<M: Display>(self, message: M) -> Self;
}

impl<T, E: Debug> ErrorPrinter for Result<T, E> {
    #[track_caller]
    fn log_error<M: Display>(self, message: M) -> Self {
        if let Err(e) = &self {
            let caller = caller_location();
            error!(caller = %caller, "{message}, error: {e:?}");
        }
        self
    }

    #[track_caller]
    fn warn_error<M: Display>(self, message: M) -> Self {
        if let Err(e) = &self {
            let caller = caller_location();
            warn!(caller = %caller, "{message}, error: {e:?}");
        }
        self
    }

    #[track_caller]
    fn info_error<M: Display>(self, message: M) -> Self {
        if let Err(e) = &self {
            let caller = caller_location();
            info!(caller = %caller, "{message}, error: {e:?}");
        }
        self
    }

    #[track_caller]
    fn debug_error<M: Display>(self, message: M) -> Self {
        if let Err(e) = &self {
            let caller = caller_location();
            debug!(caller = %caller, "{message}, error: {e:?}");
        }
        self
    }
}

/// Same idea as [`ErrorPrinter`] for `Option`: a `None` is logged and passed through.
pub trait OptionPrinter {
    fn error_none<M: Display>(self, message: M) -> Self;

    fn warn_none<M: Display>(self, message: M) -> Self;

    fn info_none<M: Display>(self, message: M) -> Self;

    fn debug_none<M: Display>(self, message: M) -> Self;
}

impl<T> OptionPrinter for Option<T> {
    #[track_caller]
    fn error_none<M: Display>(self, message: M) -> Self {
        if self.is_none() {
            let caller = caller_location();
            error!(caller = %caller, "{message}");
        }
        self
    }

    #[track_caller]
    fn warn_none<M: Display>(self, message: M) -> Self {
        if self.is_none() {
            let caller = caller_location();
            warn!(caller = %caller, "{message}");
        }
        self
    }

    #[track_caller]
    fn info_none<M: Display>(self, message: M) -> Self {
        if self.is_none() {
            let caller = caller_location();
            info!(caller = %caller, "{message}");
        }
        self
    }

    #[track_caller]
    fn debug_none<M: Display>(self, message: M) -> Self {
        if self.is_none() {
            let caller = caller_location();
            debug!(caller = %caller, "{message}");
        }
        self
    }
}

#[track_caller]
fn caller_location() -> String {
    let location = Location::caller();
    format!("{}:{}", location.file(), location.line())
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[traced_test]
    #[test]
    fn test_log_error_passes_value_through() {
        let ok: Result<u32, String> = Ok(7);
        assert_eq!(ok.log_error("should not print"), Ok(7));
        assert!(!logs_contain("should not print"));

        let err: Result<u32, String> = Err("disk on fire".to_string());
        let err = err.warn_error("reading cache entry");
        assert_eq!(err, Err("disk on fire".to_string()));
        assert!(logs_contain("reading cache entry"));
        assert!(logs_contain("disk on fire"));
    }

    #[traced_test]
    #[test]
    fn test_option_none_is_logged() {
        let some = Some(3).info_none("value missing");
        assert_eq!(some, Some(3));
        assert!(!logs_contain("value missing"));

        let none: Option<u32> = None.info_none("no credentials configured");
        assert!(none.is_none());
        assert!(logs_contain("no credentials configured"));
    }
}
