//! POP3 command and connect handlers for the linewise handler chain.
//!
//! [`handler_chain`] returns a builder holding the greeting plus the
//! USER/PASS/DELE/RSET/NOOP/QUIT handlers. Embedders may add, replace or
//! remove handlers before wiring it.

mod handlers;
mod mailbox;
mod replies;

use linewise::{ChainBuilder, ProtocolConfig, State, StateKey};
use std::sync::Arc;

pub use crate::handlers::{
    DeleCmdHandler, NoopCmdHandler, PassCmdHandler, QuitCmdHandler, RsetCmdHandler,
    UserCmdHandler, WelcomeMessageHandler,
};
pub use mailbox::{Mailbox, MailboxError, MailboxFactory};
pub use replies::Pop3Replies;

/// Connected, no user given yet.
pub const AUTHENTICATION_READY: State = State::new("authentication_ready");
/// USER accepted, waiting for PASS.
pub const AUTHENTICATION_USERSET: State = State::new("authentication_userset");
/// Authenticated; the mailbox is open.
pub const TRANSACTION: State = State::new("transaction");
/// QUIT received during a transaction; deletions have been applied.
pub const UPDATE: State = State::new("update");

/// Message numbers marked for deletion during the transaction.
pub const DELETED_UIDS: StateKey<Vec<u64>> = StateKey::new("pop3.deleted_uids");
/// Mailbox opened by PASS.
pub const MAILBOX: StateKey<Arc<dyn Mailbox>> = StateKey::new("pop3.mailbox");

/// Builder holding the standard POP3 handler set, in protocol order.
pub fn handler_chain(config: &ProtocolConfig, mailboxes: Arc<dyn MailboxFactory>) -> ChainBuilder {
    let mut builder = ChainBuilder::new();
    builder
        .replies(Pop3Replies)
        .add(WelcomeMessageHandler::new(config))
        .add(UserCmdHandler)
        .add(PassCmdHandler::new(mailboxes))
        .add(DeleCmdHandler)
        .add(RsetCmdHandler)
        .add(NoopCmdHandler)
        .add(QuitCmdHandler::new(config));
    builder
}
