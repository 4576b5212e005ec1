use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info, warn};

/// Controls how a configuration value is parsed from an environment string.
pub trait ParsableConfigValue: std::fmt::Debug + Sized {
    fn parse_user_value(value: &str) -> Option<Self>;

    /// Parse the value, returning the default if it is absent or can't be parsed.
    /// A value that can't be parsed is reported with a warning.
    fn parse(variable_name: &str, value: Option<String>, default: Self) -> Self {
        match value {
            Some(v) => match Self::parse_user_value(&v) {
                Some(v) => {
                    info!("Config: {variable_name} = {v:?} (user set)");
                    v
                },
                None => {
                    warn!("Configuration value {v} for {variable_name} cannot be parsed into correct type; reverting to default.");
                    info!("Config: {variable_name} = {default:?} (default due to parse error)");
                    default
                },
            },
            None => {
                debug!("Config: {variable_name} = {default:?} (default)");
                default
            },
        }
    }
}

/// Types whose `FromStr` implementation is the right parser for a config value.
pub trait FromStrParseable: FromStr + std::fmt::Debug {}

impl<T: FromStrParseable> ParsableConfigValue for T {
    fn parse_user_value(value: &str) -> Option<Self> {
        value.trim().parse::<T>().ok()
    }
}

impl FromStrParseable for usize {}
impl FromStrParseable for u32 {}
impl FromStrParseable for u64 {}
impl FromStrParseable for i32 {}
impl FromStrParseable for i64 {}
impl FromStrParseable for String {}

/// true: "1","true","yes","y","on"; false: "0","false","no","n","off"
fn parse_bool_value(value: &str) -> Option<bool> {
    let t = value.trim().to_ascii_lowercase();

    match t.as_str() {
        "0" | "false" | "no" | "n" | "off" => Some(false),
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        _ => None,
    }
}

impl ParsableConfigValue for bool {
    fn parse_user_value(value: &str) -> Option<Self> {
        parse_bool_value(value)
    }
}

/// `None` unless the user sets the value.
impl<T: ParsableConfigValue> ParsableConfigValue for Option<T> {
    fn parse_user_value(value: &str) -> Option<Self> {
        T::parse_user_value(value).map(Some)
    }
}

/// Accepts the duration_str suffixes, e.g. "90s", "2m", "1h".
impl ParsableConfigValue for Duration {
    fn parse_user_value(value: &str) -> Option<Self> {
        duration_str::parse(value.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_words() {
        assert_eq!(bool::parse_user_value("yes"), Some(true));
        assert_eq!(bool::parse_user_value(" OFF "), Some(false));
        assert_eq!(bool::parse_user_value("maybe"), None);
    }

    #[test]
    fn test_parse_falls_back_to_default() {
        assert_eq!(i64::parse("X", Some("not a number".to_string()), 5), 5);
        assert_eq!(i64::parse("X", Some("-3".to_string()), 5), -3);
        assert_eq!(i64::parse("X", None, 5), 5);
    }

    #[test]
    fn test_option_and_duration() {
        let v: Option<String> = ParsableConfigValue::parse("X", Some("https://fm.example".to_string()), None);
        assert_eq!(v.as_deref(), Some("https://fm.example"));
        assert_eq!(Duration::parse_user_value("2m"), Some(Duration::from_secs(120)));
        assert_eq!(Duration::parse_user_value("soon"), None);
    }
}
