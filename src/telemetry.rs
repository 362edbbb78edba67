//! Telemetry utilities: subscriber setup, handler timing and span constructors.

use std::time::{Duration, Instant};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error installing the global subscriber.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"linewise=debug"`).
///
/// Fails if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TelemetryError(e.to_string()))
}

/// Stopwatch around a single handler invocation.
///
/// Only the primary handler is timed; decorator overhead is excluded.
pub(crate) struct HandlerTimer {
    start: Instant,
}

impl HandlerTimer {
    pub(crate) fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Duration in whole microseconds for log fields, saturating at `u64::MAX`.
pub(crate) fn as_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Render a caught panic payload for logging.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Standardized span constructors.
pub mod spans {
    use std::net::SocketAddr;
    use tracing::{Span, debug_span, info_span};
    use uuid::Uuid;

    /// Create a span for a client session.
    pub fn session(id: &Uuid, peer: Option<&SocketAddr>) -> Span {
        if let Some(peer) = peer {
            info_span!("session", id = %id, peer = %peer)
        } else {
            info_span!("session", id = %id)
        }
    }

    /// Create a span for a command handler invocation.
    pub fn command(parent: &Span, name: &str, handler: &str) -> Span {
        debug_span!(parent: parent, "command", name = %name, handler = %handler)
    }

    /// Create a span for a connect or disconnect handler invocation.
    pub fn lifecycle(parent: &Span, phase: &'static str, handler: &str) -> Span {
        debug_span!(parent: parent, "lifecycle", phase = phase, handler = %handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_handles_both_payload_kinds() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn micros_saturate_instead_of_truncating() {
        assert_eq!(as_micros(Duration::from_millis(3)), 3_000);
        assert_eq!(as_micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn init_twice_fails() {
        // The first call may also fail if another test installed a subscriber.
        let _ = init("debug");
        assert!(init("debug").is_err());
    }
}
