use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to deserialize config: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Config validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Loads a YAML config. A missing file means "use defaults"; a malformed or
/// invalid file is an error.
pub fn load_yaml_config<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default + Validate,
{
    let config = match std::fs::read_to_string(path) {
        Ok(content) => serde_yaml_ng::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        Err(e) if e.kind() == ErrorKind::NotFound => T::default(),
        Err(e) => return Err(e.into()),
    };

    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}
