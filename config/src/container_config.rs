use crate::groups;

/// All configuration groups used by the container field stack.
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    pub cache: groups::cache::ConfigValueGroup,
    pub remote: groups::remote::ConfigValueGroup,
    pub storage: groups::storage::ConfigValueGroup,
    pub log: groups::log::ConfigValueGroup,
}

impl ContainerConfig {
    /// Defaults only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CONTAINER_FIELD_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            cache: groups::cache::ConfigValueGroup::from_env(),
            remote: groups::remote::ConfigValueGroup::from_env(),
            storage: groups::storage::ConfigValueGroup::from_env(),
            log: groups::log::ConfigValueGroup::from_env(),
        }
    }
}
