//! Unified error handling for linewise.
//!
//! Errors are split by the phase in which they can occur: building the chain
//! ([`ChainError`]), wiring it ([`WiringError`]), and running handlers against
//! live sessions ([`HandlerError`]). Configuration errors live in
//! [`crate::config`].

use crate::handler::ExtensionKind;
use thiserror::Error;

// ============================================================================
// Chain Errors (configuration phase)
// ============================================================================

/// Errors raised while assembling or publishing a handler chain.
///
/// These are programming-contract violations: callers should treat them as
/// fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("handler index {index} out of bounds for chain of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("handler chain has not been wired yet")]
    NotWired,

    #[error("handler chain is already wired and published")]
    AlreadyWired,
}

// ============================================================================
// Wiring Errors (freeze phase)
// ============================================================================

/// Errors raised while resolving extensions during [`crate::ChainBuilder::wire`].
///
/// A wiring error means no [`crate::Chain`] was produced; the server must not
/// start accepting connections.
#[derive(Debug, Error)]
pub enum WiringError {
    #[error("command handler {handler} does not implement any command")]
    NoCommands { handler: &'static str },

    #[error("handler {handler} rejected {kind} extensions: {reason}")]
    Extension {
        handler: &'static str,
        kind: ExtensionKind,
        reason: String,
    },
}

// ============================================================================
// Handler Errors (serve phase)
// ============================================================================

/// Errors a handler may return while processing a session.
///
/// The dispatcher and lifecycle runner catch these at a single point and turn
/// them into a protocol reply; they never reach the transport.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("backing store failure: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Wrap a backing-store error.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Store(_) => "store_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;
