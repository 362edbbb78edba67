//! Commands of the TRANSACTION state.

use crate::{DELETED_UIDS, TRANSACTION};
use async_trait::async_trait;
use linewise::{
    CommandHandler, HandlerError, HandlerResult, ProtocolHandler, Request, Response, Session, State,
};
use std::sync::Arc;

/// Handler for DELE. Marks a message; removal happens at QUIT.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleCmdHandler;

impl ProtocolHandler for DeleCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-dele"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for DeleCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["DELE"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[TRANSACTION])
    }

    async fn on_command(
        &self,
        session: &mut Session,
        request: &Request,
    ) -> HandlerResult<Option<Response>> {
        // Message numbers start at 1.
        let uid = request
            .argument()
            .and_then(|arg| arg.trim().parse::<u64>().ok())
            .filter(|&uid| uid > 0)
            .ok_or_else(|| HandlerError::InvalidArgument("Usage: DELE [mail number]".to_string()))?;

        if !session.contains(&DELETED_UIDS) {
            session.insert(&DELETED_UIDS, Vec::new());
        }
        let deleted = session
            .get_mut(&DELETED_UIDS)
            .ok_or_else(|| HandlerError::Internal("deleted list missing".to_string()))?;

        if deleted.contains(&uid) {
            return Ok(Some(Response::err(format!(
                "Message ({uid}) already deleted."
            ))));
        }
        deleted.push(uid);
        Ok(Some(Response::ok("Message deleted")))
    }
}

/// Handler for RSET. Unmarks every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsetCmdHandler;

impl ProtocolHandler for RsetCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-rset"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for RsetCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["RSET"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[TRANSACTION])
    }

    async fn on_command(
        &self,
        session: &mut Session,
        _request: &Request,
    ) -> HandlerResult<Option<Response>> {
        session.insert(&DELETED_UIDS, Vec::new());
        Ok(Some(Response::ok("")))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCmdHandler;

impl ProtocolHandler for NoopCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-noop"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for NoopCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["NOOP"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[TRANSACTION])
    }

    async fn on_command(
        &self,
        _session: &mut Session,
        _request: &Request,
    ) -> HandlerResult<Option<Response>> {
        Ok(Some(Response::ok("")))
    }
}
