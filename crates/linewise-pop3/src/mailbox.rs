//! Backing-store boundary.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("message {0} not found")]
    NotFound(u64),
    #[error("mailbox unavailable: {0}")]
    Unavailable(String),
}

/// An opened mailbox.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Permanently remove a message.
    async fn remove(&self, uid: u64) -> Result<(), MailboxError>;
}

/// Opens mailboxes for authenticated users.
#[async_trait]
pub trait MailboxFactory: Send + Sync {
    /// Returns `Ok(None)` when the credentials are rejected.
    async fn open(&self, user: &str, password: &str)
        -> Result<Option<Arc<dyn Mailbox>>, MailboxError>;
}
