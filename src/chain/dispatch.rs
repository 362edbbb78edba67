//! Command dispatch.

use super::Chain;
use crate::error::HandlerError;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;
use crate::telemetry::{HandlerTimer, as_micros, panic_message, spans};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{Instrument, debug, error, warn};

impl Chain {
    /// Dispatch one request against the session.
    ///
    /// Always yields exactly one response. A handler rejecting its argument
    /// with [`HandlerError::InvalidArgument`] gets the protocol's
    /// invalid-argument reply. Other handler errors and panics are logged and
    /// turned into the server-error reply; they never propagate to the
    /// caller. When the returned response
    /// [ends the session](Response::ends_session) the caller must close the
    /// connection after writing it.
    pub async fn dispatch(&self, session: &mut Session, request: &Request) -> Response {
        let command = request.command();
        let handlers = self.command_handlers(command);

        if handlers.is_empty() {
            debug!(parent: session.span(), command, "Unknown command");
            return self.replies.unknown_command(request);
        }

        let state = session.state();
        // Collected so no closure-typed iterator is held across `.await`,
        // which would keep the returned future from being `Send`.
        let eligible: Vec<_> = handlers
            .iter()
            .filter(|h| h.valid_states().is_none_or(|states| states.contains(&state)))
            .collect();

        if eligible.is_empty() {
            debug!(parent: session.span(), command, state = %state, "Command not valid in state");
            return self.replies.invalid_state(request, state);
        }

        for handler in eligible {
            let span = spans::command(session.span(), command, handler.name());
            let timer = HandlerTimer::start();
            let outcome = AssertUnwindSafe(handler.on_command(session, request))
                .catch_unwind()
                .instrument(span)
                .await;

            match outcome {
                Ok(Ok(Some(response))) => {
                    debug!(
                        parent: session.span(),
                        command,
                        handler = handler.name(),
                        elapsed_us = as_micros(timer.elapsed()),
                        end_session = response.ends_session(),
                        "Command handled"
                    );
                    return response;
                }
                Ok(Ok(None)) => continue,
                Ok(Err(HandlerError::InvalidArgument(reason))) => {
                    debug!(
                        parent: session.span(),
                        command,
                        handler = handler.name(),
                        reason = %reason,
                        "Invalid argument"
                    );
                    return self.replies.invalid_argument(request, &reason);
                }
                Ok(Err(e)) => {
                    error!(
                        parent: session.span(),
                        session = %session.id(),
                        command,
                        handler = handler.name(),
                        error = %e,
                        error_code = e.error_code(),
                        "Command handler failed"
                    );
                    return self.replies.server_error(request);
                }
                Err(payload) => {
                    error!(
                        parent: session.span(),
                        session = %session.id(),
                        command,
                        handler = handler.name(),
                        panic = panic_message(payload.as_ref()),
                        "Command handler panicked"
                    );
                    return self.replies.server_error(request);
                }
            }
        }

        warn!(parent: session.span(), command, "No handler produced a response");
        self.replies.server_error(request)
    }
}
