//! QUIT: end the session, applying pending deletions first.

use crate::{DELETED_UIDS, MAILBOX, TRANSACTION, UPDATE};
use async_trait::async_trait;
use linewise::{
    CommandHandler, HandlerResult, ProtocolConfig, ProtocolHandler, Request, Response, Session,
};
use std::sync::Arc;
use tracing::{error, info};

/// Handler for QUIT.
///
/// Before authentication it only signs off. In the TRANSACTION state every
/// message marked by DELE is removed from the mailbox. Removal keeps going
/// past failures; if any message could not be removed the client gets
/// `-ERR`, but the session still ends. The session enters UPDATE only once
/// every removal has been attempted.
#[derive(Debug, Clone)]
pub struct QuitCmdHandler {
    sign_off: String,
}

impl QuitCmdHandler {
    pub fn new(config: &ProtocolConfig) -> Self {
        Self {
            sign_off: format!("{} signing off.", config.software_name),
        }
    }
}

impl ProtocolHandler for QuitCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-quit"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for QuitCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["QUIT"]
    }

    async fn on_command(
        &self,
        session: &mut Session,
        _request: &Request,
    ) -> HandlerResult<Option<Response>> {
        if session.state() != TRANSACTION {
            return Ok(Some(Response::ok(self.sign_off.clone()).end_session()));
        }

        // The list stays in the session until the mailbox confirms each
        // removal, so an aborted QUIT leaves exactly the unremoved uids.
        let pending = session.get(&DELETED_UIDS).cloned().unwrap_or_default();
        if pending.is_empty() {
            session.remove(&DELETED_UIDS);
            session.set_state(UPDATE);
            return Ok(Some(Response::ok(self.sign_off.clone()).end_session()));
        }

        let Some(mailbox) = session.get(&MAILBOX).cloned() else {
            error!(
                parent: session.span(),
                session = %session.id(),
                pending = pending.len(),
                "No mailbox open, deleted messages were not removed"
            );
            session.set_state(UPDATE);
            return Ok(Some(not_removed()));
        };

        let total = pending.len();
        let mut failed = 0usize;
        for uid in pending {
            match mailbox.remove(uid).await {
                Ok(()) => {
                    if let Some(list) = session.get_mut(&DELETED_UIDS) {
                        list.retain(|&marked| marked != uid);
                    }
                }
                Err(e) => {
                    failed += 1;
                    error!(
                        parent: session.span(),
                        session = %session.id(),
                        uid,
                        error = %e,
                        "Failed to remove deleted message"
                    );
                }
            }
        }

        session.remove(&DELETED_UIDS);
        session.set_state(UPDATE);
        if failed > 0 {
            return Ok(Some(not_removed()));
        }
        info!(
            parent: session.span(),
            removed = total,
            "Deleted messages removed"
        );
        Ok(Some(Response::ok(self.sign_off.clone()).end_session()))
    }
}

fn not_removed() -> Response {
    Response::err("Some deleted messages were not removed").end_session()
}
