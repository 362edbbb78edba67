//! Default value functions for configuration.

pub const DEFAULT_SOFTWARE_NAME: &str = "Linewise Protocols Server";
pub const DEFAULT_HELLO_NAME: &str = "localhost";

pub fn default_software_name() -> String {
    DEFAULT_SOFTWARE_NAME.to_string()
}

pub fn default_hello_name() -> String {
    DEFAULT_HELLO_NAME.to_string()
}
