//! Write-once publication of a wired chain.

use super::Chain;
use crate::error::ChainError;
use std::sync::{Arc, OnceLock};

/// Process-wide slot holding the chain every connection task serves from.
///
/// The chain is published once, at startup, before the first connection is
/// accepted. Publication is the only synchronisation point; reads afterwards
/// are lock-free.
///
/// ```
/// use linewise::{ChainBuilder, ChainError, SharedChain};
///
/// static CHAIN: SharedChain = SharedChain::new();
///
/// assert_eq!(CHAIN.get().unwrap_err(), ChainError::NotWired);
/// CHAIN.publish(ChainBuilder::new().wire().unwrap()).unwrap();
/// assert!(CHAIN.get().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct SharedChain {
    slot: OnceLock<Arc<Chain>>,
}

impl SharedChain {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Publish a wired chain. Fails with [`ChainError::AlreadyWired`] if a
    /// chain was published before; the earlier chain stays in place.
    pub fn publish(&self, chain: Chain) -> Result<Arc<Chain>, ChainError> {
        let chain = Arc::new(chain);
        self.slot
            .set(Arc::clone(&chain))
            .map_err(|_| ChainError::AlreadyWired)?;
        Ok(chain)
    }

    /// The published chain. Fails with [`ChainError::NotWired`] before
    /// [`publish`](Self::publish) has succeeded.
    pub fn get(&self) -> Result<&Arc<Chain>, ChainError> {
        self.slot.get().ok_or(ChainError::NotWired)
    }

    pub fn is_published(&self) -> bool {
        self.slot.get().is_some()
    }
}
