//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::ProtocolConfig;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hello_name is required")]
    MissingHelloName,
    #[error("hello_name must not contain whitespace, got '{0}'")]
    InvalidHelloName(String),
    #[error("software_name is required")]
    MissingSoftwareName,
    #[error("{field} must be a single line")]
    MultiLine { field: &'static str },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &ProtocolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.hello_name.is_empty() {
        errors.push(ValidationError::MissingHelloName);
    } else if config.hello_name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidHelloName(config.hello_name.clone()));
    }

    if config.software_name.trim().is_empty() {
        errors.push(ValidationError::MissingSoftwareName);
    } else if is_multi_line(&config.software_name) {
        errors.push(ValidationError::MultiLine {
            field: "software_name",
        });
    }

    // Greetings go out as a single status line.
    if let Some(greeting) = &config.greeting
        && is_multi_line(greeting)
    {
        errors.push(ValidationError::MultiLine { field: "greeting" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_multi_line(value: &str) -> bool {
    value.contains(['\r', '\n'])
}
