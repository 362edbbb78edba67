//! Parsed protocol requests.

use std::fmt;

/// A single command received from a client, already split by the parser.
///
/// The command name is normalised to ASCII upper case on construction so that
/// lookups in the chain are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: String,
    argument: Option<String>,
}

impl Request {
    /// Create a request from a command name and optional argument text.
    pub fn new(command: impl Into<String>, argument: Option<String>) -> Self {
        let mut command = command.into();
        command.make_ascii_uppercase();
        Self { command, argument }
    }

    /// Create a request without an argument.
    pub fn command_only(command: impl Into<String>) -> Self {
        Self::new(command, None)
    }

    /// The normalised command name.
    #[inline]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The raw argument text, if any.
    #[inline]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{} {}", self.command, arg),
            None => f.write_str(&self.command),
        }
    }
}
