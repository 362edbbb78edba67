//! Handler chain: assembly, wiring and serving.
//!
//! The chain has two phases, each with its own type:
//!
//! 1. [`ChainBuilder`]: mutable, ordered list of handlers used during
//!    configuration.
//! 2. [`Chain`]: produced by [`ChainBuilder::wire`], which consumes the
//!    builder. A `Chain` has no mutating methods and no interior mutability,
//!    so it can be shared behind an `Arc` by every connection task.
//!
//! Mutating a chain after it is wired does not compile:
//!
//! ```compile_fail
//! use linewise::ChainBuilder;
//!
//! let mut builder = ChainBuilder::new();
//! let chain = builder.wire().unwrap();
//! builder.clear(); // builder was moved into `wire`
//! ```
//!
//! and neither does wiring twice:
//!
//! ```compile_fail
//! use linewise::ChainBuilder;
//!
//! let builder = ChainBuilder::new();
//! let first = builder.wire().unwrap();
//! let second = builder.wire().unwrap();
//! ```
//!
//! At runtime, [`SharedChain`] offers a write-once publication point for
//! servers that look the chain up from a global.

mod builder;
mod dispatch;
mod lifecycle;
mod resolver;
mod shared;

pub use builder::ChainBuilder;
pub use lifecycle::ConnectResult;
pub use shared::SharedChain;

use crate::handler::{
    CommandHandler, ConnectHandler, ConnectHandlerResultHandler, DisconnectHandler,
    DisconnectHandlerResultHandler, ProtocolHandler,
};
use crate::response::Replies;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A connect handler together with the decorators bound to it at wiring.
pub struct ConnectBinding {
    pub(crate) handler: Arc<dyn ConnectHandler>,
    pub(crate) decorators: Arc<[Arc<dyn ConnectHandlerResultHandler>]>,
}

impl ConnectBinding {
    pub fn handler(&self) -> &Arc<dyn ConnectHandler> {
        &self.handler
    }

    pub fn decorators(&self) -> &[Arc<dyn ConnectHandlerResultHandler>] {
        &self.decorators
    }
}

/// A disconnect handler together with the decorators bound to it at wiring.
pub struct DisconnectBinding {
    pub(crate) handler: Arc<dyn DisconnectHandler>,
    pub(crate) decorators: Arc<[Arc<dyn DisconnectHandlerResultHandler>]>,
}

impl DisconnectBinding {
    pub fn handler(&self) -> &Arc<dyn DisconnectHandler> {
        &self.handler
    }

    pub fn decorators(&self) -> &[Arc<dyn DisconnectHandlerResultHandler>] {
        &self.decorators
    }
}

/// A wired, immutable handler chain.
pub struct Chain {
    handlers: Vec<Arc<dyn ProtocolHandler>>,
    commands: HashMap<String, Vec<Arc<dyn CommandHandler>>>,
    connect: Vec<ConnectBinding>,
    disconnect: Vec<DisconnectBinding>,
    replies: Arc<dyn Replies>,
}

impl Chain {
    /// All handlers in registration order.
    #[inline]
    pub fn handlers(&self) -> &[Arc<dyn ProtocolHandler>] {
        &self.handlers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn ProtocolHandler>> {
        self.handlers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn ProtocolHandler>> {
        self.handlers.iter()
    }

    /// Command handlers registered for `command`, in chain order.
    pub fn command_handlers(&self, command: &str) -> &[Arc<dyn CommandHandler>] {
        self.commands
            .get(command)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of every command with at least one handler, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn connect_bindings(&self) -> &[ConnectBinding] {
        &self.connect
    }

    pub fn disconnect_bindings(&self) -> &[DisconnectBinding] {
        &self.disconnect
    }

    pub fn replies(&self) -> &dyn Replies {
        self.replies.as_ref()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Arc<dyn ProtocolHandler>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn ProtocolHandler>>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.iter()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("commands", &self.command_names())
            .field("connect", &self.connect.len())
            .field("disconnect", &self.disconnect.len())
            .finish()
    }
}
