//! USER and PASS.

use crate::mailbox::MailboxFactory;
use crate::{AUTHENTICATION_READY, AUTHENTICATION_USERSET, DELETED_UIDS, MAILBOX, TRANSACTION};
use async_trait::async_trait;
use linewise::{
    CommandHandler, HandlerError, HandlerResult, ProtocolHandler, Request, Response, Session,
    State,
};
use std::sync::Arc;
use tracing::info;

/// Handler for USER.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserCmdHandler;

impl ProtocolHandler for UserCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-user"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for UserCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["USER"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[AUTHENTICATION_READY])
    }

    async fn on_command(
        &self,
        session: &mut Session,
        request: &Request,
    ) -> HandlerResult<Option<Response>> {
        let user = request
            .argument()
            .filter(|arg| !arg.is_empty())
            .ok_or_else(|| HandlerError::InvalidArgument("Usage: USER username".to_string()))?;

        session.set_user(Some(user.to_string()));
        session.set_state(AUTHENTICATION_USERSET);
        Ok(Some(Response::ok("")))
    }
}

/// Handler for PASS. Opens the user's mailbox through a [`MailboxFactory`].
pub struct PassCmdHandler {
    mailboxes: Arc<dyn MailboxFactory>,
}

impl PassCmdHandler {
    pub fn new(mailboxes: Arc<dyn MailboxFactory>) -> Self {
        Self { mailboxes }
    }
}

impl ProtocolHandler for PassCmdHandler {
    fn name(&self) -> &'static str {
        "pop3-pass"
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for PassCmdHandler {
    fn commands(&self) -> &[&'static str] {
        &["PASS"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[AUTHENTICATION_USERSET])
    }

    async fn on_command(
        &self,
        session: &mut Session,
        request: &Request,
    ) -> HandlerResult<Option<Response>> {
        let password = request
            .argument()
            .ok_or_else(|| HandlerError::InvalidArgument("Usage: PASS password".to_string()))?;
        let user = session
            .user()
            .ok_or_else(|| HandlerError::Internal("PASS without a user".to_string()))?
            .to_string();

        match self
            .mailboxes
            .open(&user, password)
            .await
            .map_err(HandlerError::store)?
        {
            Some(mailbox) => {
                session.insert(&MAILBOX, mailbox);
                session.insert(&DELETED_UIDS, Vec::new());
                session.set_state(TRANSACTION);
                info!(parent: session.span(), user = %user, "User authenticated");
                Ok(Some(Response::ok(format!("Welcome {user}"))))
            }
            None => {
                session.set_user(None);
                session.set_state(AUTHENTICATION_READY);
                Ok(Some(Response::err("Authentication failed.")))
            }
        }
    }
}
