//! Mutable handler list used during configuration.

use super::{Chain, resolver};
use crate::error::{ChainError, WiringError};
use crate::handler::ProtocolHandler;
use crate::response::{DefaultReplies, Replies};
use std::sync::Arc;

/// Ordered, mutable collection of handlers.
///
/// Insertion order is significant: it is the dispatch priority among command
/// handlers for the same command and the order in which decorators run.
pub struct ChainBuilder {
    handlers: Vec<Arc<dyn ProtocolHandler>>,
    replies: Arc<dyn Replies>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            replies: Arc::new(DefaultReplies),
        }
    }

    /// Use a protocol-specific reply catalogue instead of [`DefaultReplies`].
    pub fn replies(&mut self, replies: impl Replies + 'static) -> &mut Self {
        self.replies = Arc::new(replies);
        self
    }

    /// Append a handler.
    pub fn add<H: ProtocolHandler>(&mut self, handler: H) -> &mut Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Append a handler that is already shared, e.g. one also referenced by
    /// test code or registered twice.
    pub fn add_shared(&mut self, handler: Arc<dyn ProtocolHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    /// Insert a handler at `index`, shifting later handlers back.
    pub fn insert(
        &mut self,
        index: usize,
        handler: Arc<dyn ProtocolHandler>,
    ) -> Result<(), ChainError> {
        if index > self.handlers.len() {
            return Err(self.out_of_bounds(index));
        }
        self.handlers.insert(index, handler);
        Ok(())
    }

    /// Replace the handler at `index`, returning the old one.
    pub fn set(
        &mut self,
        index: usize,
        handler: Arc<dyn ProtocolHandler>,
    ) -> Result<Arc<dyn ProtocolHandler>, ChainError> {
        let oob = self.out_of_bounds(index);
        let slot = self.handlers.get_mut(index).ok_or(oob)?;
        Ok(std::mem::replace(slot, handler))
    }

    /// Remove the handler at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Arc<dyn ProtocolHandler>, ChainError> {
        if index >= self.handlers.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.handlers.remove(index))
    }

    /// Remove every handler that is the same instance as `handler`.
    /// Returns how many entries were removed.
    pub fn remove_handler(&mut self, handler: &Arc<dyn ProtocolHandler>) -> usize {
        let before = self.handlers.len();
        self.handlers.retain(|h| !Arc::ptr_eq(h, handler));
        before - self.handlers.len()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
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

    /// Resolve extensions and freeze the chain.
    ///
    /// Consumes the builder: once wired, the handler list can no longer be
    /// changed. On error nothing is returned, so a partially wired chain can
    /// never serve connections.
    pub fn wire(self) -> Result<Chain, WiringError> {
        let tables = resolver::resolve(&self.handlers)?;

        tracing::info!(
            handlers = self.handlers.len(),
            commands = tables.commands.len(),
            connect = tables.connect.len(),
            disconnect = tables.disconnect.len(),
            "Handler chain wired"
        );

        Ok(Chain {
            handlers: self.handlers,
            commands: tables.commands,
            connect: tables.connect,
            disconnect: tables.disconnect,
            replies: self.replies,
        })
    }

    fn out_of_bounds(&self, index: usize) -> ChainError {
        ChainError::IndexOutOfBounds {
            index,
            len: self.handlers.len(),
        }
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ProtocolHandler> Extend<H> for ChainBuilder {
    fn extend<I: IntoIterator<Item = H>>(&mut self, iter: I) {
        for handler in iter {
            self.add(handler);
        }
    }
}
