pub mod macros;

mod container_config;
mod guards;
mod parse;

pub mod groups;

pub use container_config::ContainerConfig;
pub use guards::EnvVarGuard;
pub use parse::{FromStrParseable, ParsableConfigValue};

/// Prefix of every environment variable read by a config group.
pub const ENV_PREFIX: &str = "CONTAINER_FIELD";
