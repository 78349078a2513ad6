use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config option {0} does not exist")]
    UnknownOption(String),

    #[error("config key '{0}' conflicts with a value at a parent path")]
    KeyConflict(String),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] toml::de::Error),
}
