//! Configuration loading and validation.
//!
//! This module is split into logical submodules:
//! - [`types`]: the [`ProtocolConfig`] struct and TOML loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks returning every problem found
//!
//! The core chain takes no configuration of its own; handlers read the
//! options they need from a [`ProtocolConfig`] when they are constructed.

mod defaults;
mod types;
mod validation;

pub use types::{ConfigError, ProtocolConfig};
pub use validation::{ValidationError, validate};
