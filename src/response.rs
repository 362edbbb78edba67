//! Protocol responses and the per-protocol reply catalogue.

use crate::request::Request;
use crate::session::State;
use std::borrow::Cow;

/// Status of a response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Positive completion (`+OK` in POP3).
    Ok,
    /// Negative completion (`-ERR` in POP3).
    Err,
    /// Numeric reply code for protocols that use them (SMTP, LMTP).
    Code(u16),
}

impl Status {
    /// Whether this status signals success.
    ///
    /// Numeric codes follow the SMTP convention: 2xx and 3xx are positive.
    pub const fn is_positive(&self) -> bool {
        match self {
            Self::Ok => true,
            Self::Err => false,
            Self::Code(code) => *code >= 200 && *code < 400,
        }
    }
}

/// A reply produced by a handler.
///
/// Responses are immutable once built; the builder-style setters consume and
/// return `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    text: Cow<'static, str>,
    lines: Vec<String>,
    end_session: bool,
}

impl Response {
    pub fn new(status: Status, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            text: text.into(),
            lines: Vec::new(),
            end_session: false,
        }
    }

    pub fn ok(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Status::Ok, text)
    }

    pub fn err(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Status::Err, text)
    }

    /// Append a line to the multi-line body.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Mark this response as the last one of the session.
    #[must_use]
    pub fn end_session(mut self) -> Self {
        self.end_session = true;
        self
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the transport must close the connection after sending this.
    #[inline]
    pub fn ends_session(&self) -> bool {
        self.end_session
    }
}

/// Protocol-defined replies the core produces on its own.
///
/// The dispatcher and lifecycle runner never invent wire text; they ask the
/// chain's `Replies` implementation instead. Every method has a generic
/// default so a protocol only overrides what it needs.
pub trait Replies: Send + Sync {
    /// No handler is registered for the request's command.
    fn unknown_command(&self, request: &Request) -> Response {
        Response::err(format!("Unknown command {}", request.command()))
    }

    /// Handlers exist for the command, but none accepts the session state.
    fn invalid_state(&self, request: &Request, state: State) -> Response {
        Response::err(format!(
            "Command {} not valid in state {}",
            request.command(),
            state
        ))
    }

    /// A handler rejected the request's argument. `reason` is the handler's
    /// message, usually a usage line.
    fn invalid_argument(&self, _request: &Request, reason: &str) -> Response {
        Response::err(reason.to_string())
    }

    /// A handler failed while processing the request.
    fn server_error(&self, _request: &Request) -> Response {
        Response::err("Internal server error")
    }

    /// A connect handler failed; the connection will be dropped.
    fn connect_failed(&self) -> Response {
        Response::err("Unable to process connection").end_session()
    }
}

/// Generic replies used when a chain is built without a protocol catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReplies;

impl Replies for DefaultReplies {}
