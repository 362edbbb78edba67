//! Handler capability traits.
//!
//! Every handler placed in a chain implements [`ProtocolHandler`]. Its
//! `as_*` projections declare which capabilities the handler has; the chain
//! calls them once at wiring time and keeps typed tables afterwards, so no
//! capability checks happen while serving traffic.
//!
//! ## Capabilities
//!
//! - [`CommandHandler`]: answers one or more named commands
//! - [`ConnectHandler`]: runs when a connection is accepted
//! - [`DisconnectHandler`]: runs when a connection is torn down
//! - [`ConnectHandlerResultHandler`]: decorates every connect handler
//! - [`DisconnectHandlerResultHandler`]: decorates every disconnect handler
//! - [`ExtensibleHandler`]: receives other handlers of chosen kinds at wiring
//!
//! A handler may implement several of these. Handler instances are shared by
//! all sessions, so they must not keep per-connection data in their fields.
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use linewise::{
//!     CommandHandler, HandlerResult, ProtocolHandler, Request, Response, Session,
//! };
//! use std::sync::Arc;
//!
//! struct NoopHandler;
//!
//! impl ProtocolHandler for NoopHandler {
//!     fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
//!         Some(self)
//!     }
//! }
//!
//! #[async_trait]
//! impl CommandHandler for NoopHandler {
//!     fn commands(&self) -> &[&'static str] {
//!         &["NOOP"]
//!     }
//!
//!     async fn on_command(
//!         &self,
//!         _session: &mut Session,
//!         _request: &Request,
//!     ) -> HandlerResult<Option<Response>> {
//!         Ok(Some(Response::ok("")))
//!     }
//! }
//! ```

use crate::error::{HandlerResult, WiringError};
use crate::request::Request;
use crate::response::Response;
use crate::session::{Session, State};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Base trait
// ============================================================================

/// Base trait of everything that can be added to a handler chain.
pub trait ProtocolHandler: Send + Sync + 'static {
    /// Name used in logs. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        None
    }

    fn as_connect(self: Arc<Self>) -> Option<Arc<dyn ConnectHandler>> {
        None
    }

    fn as_disconnect(self: Arc<Self>) -> Option<Arc<dyn DisconnectHandler>> {
        None
    }

    fn as_connect_result(self: Arc<Self>) -> Option<Arc<dyn ConnectHandlerResultHandler>> {
        None
    }

    fn as_disconnect_result(self: Arc<Self>) -> Option<Arc<dyn DisconnectHandlerResultHandler>> {
        None
    }

    fn as_extensible(self: Arc<Self>) -> Option<Arc<dyn ExtensibleHandler>> {
        None
    }
}

// ============================================================================
// Primary handlers
// ============================================================================

/// Handler for one or more named commands.
#[async_trait]
pub trait CommandHandler: ProtocolHandler {
    /// Command names this handler answers, in upper case.
    fn commands(&self) -> &[&'static str];

    /// States in which this handler may run. `None` means any state.
    fn valid_states(&self) -> Option<&[State]> {
        None
    }

    /// Handle a request.
    ///
    /// Returning `Ok(None)` passes the request to the next eligible handler
    /// registered for the same command.
    async fn on_command(
        &self,
        session: &mut Session,
        request: &Request,
    ) -> HandlerResult<Option<Response>>;
}

/// Handler run when a connection is accepted.
#[async_trait]
pub trait ConnectHandler: ProtocolHandler {
    /// Run at connection open. A response is sent to the client; a response
    /// marked end-of-session refuses the connection.
    async fn on_connect(&self, session: &mut Session) -> HandlerResult<Option<Response>>;
}

/// Handler run when a connection is torn down.
#[async_trait]
pub trait DisconnectHandler: ProtocolHandler {
    async fn on_disconnect(&self, session: &mut Session) -> HandlerResult<()>;
}

// ============================================================================
// Decorators
// ============================================================================

/// Observes or rewrites the outcome of every [`ConnectHandler`].
///
/// Decorators run in chain order after the connect handler; each receives
/// the outcome returned by the previous one and its return value replaces it.
pub trait ConnectHandlerResultHandler: ProtocolHandler {
    fn on_response(
        &self,
        session: &mut Session,
        response: Option<Response>,
        elapsed: Duration,
        handler: &dyn ConnectHandler,
    ) -> Option<Response>;
}

/// Observes or rewrites the outcome of every [`DisconnectHandler`].
///
/// `completed` is `false` when the disconnect handler failed.
pub trait DisconnectHandlerResultHandler: ProtocolHandler {
    fn on_response(
        &self,
        session: &mut Session,
        completed: bool,
        elapsed: Duration,
        handler: &dyn DisconnectHandler,
    ) -> bool;
}

// ============================================================================
// Extension wiring
// ============================================================================

/// Capability kinds an [`ExtensibleHandler`] can ask to be wired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    Command,
    Connect,
    Disconnect,
    ConnectResult,
    DisconnectResult,
}

impl ExtensionKind {
    /// Whether `handler` has this capability.
    pub fn matches(self, handler: &Arc<dyn ProtocolHandler>) -> bool {
        let handler = Arc::clone(handler);
        match self {
            Self::Command => handler.as_command().is_some(),
            Self::Connect => handler.as_connect().is_some(),
            Self::Disconnect => handler.as_disconnect().is_some(),
            Self::ConnectResult => handler.as_connect_result().is_some(),
            Self::DisconnectResult => handler.as_disconnect_result().is_some(),
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Command => "command",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ConnectResult => "connect-result",
            Self::DisconnectResult => "disconnect-result",
        })
    }
}

/// Handler that wants to know about other handlers in the chain.
///
/// Called once per requested kind while the chain is wired, with every
/// handler of that kind in chain order (possibly none). Implementations keep
/// what they need in a write-once cell; returning an error aborts wiring.
pub trait ExtensibleHandler: ProtocolHandler {
    fn extension_kinds(&self) -> &[ExtensionKind];

    fn wire_extensions(
        &self,
        kind: ExtensionKind,
        extensions: &[Arc<dyn ProtocolHandler>],
    ) -> Result<(), WiringError>;
}
