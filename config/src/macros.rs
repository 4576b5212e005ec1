/// Macro to create a configuration value group struct.
///
/// Usage:
/// ```rust
/// mod example {
///     config::config_group!({
///         ref retries: usize = 3;
///         ref endpoint: Option<String> = None;
///     });
/// }
///
/// let group = example::ConfigValueGroup::new();
/// assert_eq!(group.retries, 3);
/// ```
///
/// This creates a `ConfigValueGroup` struct with the specified fields. Values come from the defaults
/// until `apply_env_overrides` is called, which reads `CONTAINER_FIELD_<GROUP>_<FIELD>` where the
/// group is the last segment of the invoking module's path.
#[macro_export]
macro_rules! config_group {
    ({
        $(
            $(#[$meta:meta])*
            ref $name:ident : $type:ty = $value:expr;
        )+
    }) => {
        #[allow(unused_imports)]
        use $crate::ParsableConfigValue;

        /// ConfigValueGroup struct containing all configurable values
        #[derive(Debug, Clone)]
        pub struct ConfigValueGroup {
            $(
                $(#[$meta])*
                #[allow(non_snake_case)]
                pub $name: $type,
            )+
        }

        impl Default for ConfigValueGroup {
            fn default() -> Self {
                Self {
                    $(
                        $name: {
                            let v: $type = $value;
                            v
                        },
                    )+
                }
            }
        }

        impl ConfigValueGroup {
            /// Default values only, no environment overrides.
            pub fn new() -> Self {
                Self::default()
            }

            /// Name of the group, taken from the module this group is declared in.
            pub fn group_name() -> &'static str {
                module_path!().split("::").last().unwrap_or("unknown")
            }

            /// Environment variable consulted for a field of this group.
            pub fn env_var_name(field: &str) -> String {
                format!("{}_{}_{}", $crate::ENV_PREFIX, Self::group_name().to_uppercase(), field.to_uppercase())
            }

            /// Apply environment variable overrides to this configuration group.
            pub fn apply_env_overrides(&mut self) {
                $(
                    let env_var_name = Self::env_var_name(stringify!($name));
                    let maybe_env_value = std::env::var(&env_var_name).ok();
                    let default_value: $type = $value;
                    self.$name = <$type>::parse(&env_var_name, maybe_env_value, default_value);
                )+
            }

            /// Defaults with environment overrides applied.
            pub fn from_env() -> Self {
                let mut group = Self::new();
                group.apply_env_overrides();
                group
            }
        }
    };
}
