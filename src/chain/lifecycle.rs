//! Connection open and close.
//!
//! Connect and disconnect handlers run in chain order. Each primary handler
//! is timed on its own, then every decorator bound to it at wiring time runs
//! in turn, receiving the outcome left by the previous one.

use super::{Chain, ConnectBinding, DisconnectBinding};
use crate::response::Response;
use crate::session::Session;
use crate::telemetry::{HandlerTimer, as_micros, panic_message, spans};
use futures_util::FutureExt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{Instrument, debug, error, info};

/// Outcome of running the connect handlers for a new connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResult {
    /// Responses to send, in order (typically a greeting).
    pub responses: Vec<Response>,
    /// Whether the connection may proceed to command processing.
    pub proceed: bool,
}

impl Chain {
    /// Run every connect handler for a freshly accepted connection.
    ///
    /// Stops at the first outcome that ends the session; the connection must
    /// then be closed after the collected responses are written.
    pub async fn connect(&self, session: &mut Session) -> ConnectResult {
        let mut responses = Vec::new();

        for binding in &self.connect {
            let outcome = self.run_connect(binding, session).await;
            if let Some(response) = outcome {
                let refused = response.ends_session();
                responses.push(response);
                if refused {
                    info!(
                        parent: session.span(),
                        handler = binding.handler.name(),
                        "Connection refused by connect handler"
                    );
                    return ConnectResult {
                        responses,
                        proceed: false,
                    };
                }
            }
        }

        ConnectResult {
            responses,
            proceed: true,
        }
    }

    /// Run every disconnect handler, best effort, then close the session.
    ///
    /// Returns `true` when every handler (after decoration) completed.
    pub async fn disconnect(&self, session: &mut Session) -> bool {
        let mut all_completed = true;
        for binding in &self.disconnect {
            all_completed &= run_disconnect(binding, session).await;
        }
        session.close();
        all_completed
    }

    async fn run_connect(
        &self,
        binding: &ConnectBinding,
        session: &mut Session,
    ) -> Option<Response> {
        let handler = binding.handler.as_ref();
        let span = spans::lifecycle(session.span(), "connect", handler.name());
        let timer = HandlerTimer::start();
        let result = AssertUnwindSafe(handler.on_connect(session))
            .catch_unwind()
            .instrument(span)
            .await;
        let elapsed = timer.elapsed();

        let mut outcome = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(
                    parent: session.span(),
                    session = %session.id(),
                    handler = handler.name(),
                    error = %e,
                    error_code = e.error_code(),
                    "Connect handler failed"
                );
                Some(self.replies.connect_failed())
            }
            Err(payload) => {
                error!(
                    parent: session.span(),
                    session = %session.id(),
                    handler = handler.name(),
                    panic = panic_message(payload.as_ref()),
                    "Connect handler panicked"
                );
                Some(self.replies.connect_failed())
            }
        };

        for decorator in binding.decorators.iter() {
            let previous = outcome.clone();
            outcome = match catch_unwind(AssertUnwindSafe(|| {
                decorator.on_response(session, outcome, elapsed, handler)
            })) {
                Ok(next) => next,
                Err(payload) => {
                    log_decorator_panic(session, decorator.name(), payload.as_ref());
                    previous
                }
            };
        }

        outcome
    }
}

async fn run_disconnect(binding: &DisconnectBinding, session: &mut Session) -> bool {
    let handler = binding.handler.as_ref();
    let span = spans::lifecycle(session.span(), "disconnect", handler.name());
    let timer = HandlerTimer::start();
    let result = AssertUnwindSafe(handler.on_disconnect(session))
        .catch_unwind()
        .instrument(span)
        .await;
    let elapsed = timer.elapsed();

    let mut completed = match result {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(
                parent: session.span(),
                session = %session.id(),
                handler = handler.name(),
                error = %e,
                error_code = e.error_code(),
                "Disconnect handler failed"
            );
            false
        }
        Err(payload) => {
            error!(
                parent: session.span(),
                session = %session.id(),
                handler = handler.name(),
                panic = panic_message(payload.as_ref()),
                "Disconnect handler panicked"
            );
            false
        }
    };

    for decorator in binding.decorators.iter() {
        let previous = completed;
        completed = match catch_unwind(AssertUnwindSafe(|| {
            decorator.on_response(session, completed, elapsed, handler)
        })) {
            Ok(next) => next,
            Err(payload) => {
                log_decorator_panic(session, decorator.name(), payload.as_ref());
                previous
            }
        };
    }

    debug!(
        parent: session.span(),
        handler = handler.name(),
        elapsed_us = as_micros(elapsed),
        completed,
        "Disconnect handler finished"
    );
    completed
}

fn log_decorator_panic(session: &Session, decorator: &str, payload: &(dyn std::any::Any + Send)) {
    error!(
        parent: session.span(),
        session = %session.id(),
        decorator,
        panic = panic_message(payload),
        "Result handler panicked, keeping previous outcome"
    );
}
