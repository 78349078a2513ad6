pub mod config;

pub use config::{ConfigError, ConfigOption, ConfigRegistry, Namespace, Overrides};
pub use toml::Value;
