//! Core configuration types and loading.

use super::defaults::{default_hello_name, default_software_name};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Options shared by protocol handlers.
///
/// ```toml
/// greeting = "Welcome to the example mail service"
/// software_name = "Example POP3"
/// hello_name = "pop.example.org"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtocolConfig {
    /// Full greeting text. When unset, protocols build one from
    /// `hello_name` and `software_name`.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Server software identification, shown in greetings.
    #[serde(default = "default_software_name")]
    pub software_name: String,
    /// Host name the server announces.
    #[serde(default = "default_hello_name")]
    pub hello_name: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            software_name: default_software_name(),
            hello_name: default_hello_name(),
        }
    }
}

impl ProtocolConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProtocolConfig = toml::from_str(content)?;
        Ok(config)
    }
}
