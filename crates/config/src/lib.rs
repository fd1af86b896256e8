// Configuration Management
//
// This crate handles all configuration loading for the gateway. Every setting
// comes from environment variables so the same binary runs unchanged across
// local, staging, and production deployments.

use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ApiConfig {
    /// Load the full gateway configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env().map_err(ConfigError::Invalid)?,
            logging: LoggingConfig::from_env().map_err(ConfigError::Invalid)?,
            auth: AuthConfig::from_env().map_err(ConfigError::Invalid)?,
            model: ModelConfig::from_env().map_err(ConfigError::Invalid)?,
        })
    }
}
