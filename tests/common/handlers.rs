//! Configurable handlers that record their invocations.

#![allow(dead_code)]

use super::EventLog;
use async_trait::async_trait;
use linewise::{
    CommandHandler, ConnectHandler, ConnectHandlerResultHandler, DisconnectHandler,
    DisconnectHandlerResultHandler, ExtensibleHandler, ExtensionKind, HandlerError, HandlerResult,
    ProtocolHandler, Request, Response, Session, State, WiringError,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// What a recording handler does when invoked.
#[derive(Clone)]
pub enum Behavior {
    Respond(Response),
    Pass,
    Fail,
    Panic,
}

impl Behavior {
    fn run(&self, who: &str) -> HandlerResult<Option<Response>> {
        match self {
            Self::Respond(response) => Ok(Some(response.clone())),
            Self::Pass => Ok(None),
            Self::Fail => Err(HandlerError::Internal(format!("{who} failed"))),
            Self::Panic => panic!("{who} panicked"),
        }
    }
}

/// Command handler.
pub struct Command {
    pub name: &'static str,
    pub commands: Vec<&'static str>,
    pub states: Option<Vec<State>>,
    pub behavior: Behavior,
    pub log: EventLog,
}

impl Command {
    pub fn new(name: &'static str, command: &'static str, behavior: Behavior, log: &EventLog) -> Self {
        Self {
            name,
            commands: vec![command],
            states: None,
            behavior,
            log: log.clone(),
        }
    }

    pub fn in_states(mut self, states: &[State]) -> Self {
        self.states = Some(states.to_vec());
        self
    }
}

impl ProtocolHandler for Command {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait]
impl CommandHandler for Command {
    fn commands(&self) -> &[&'static str] {
        &self.commands
    }

    fn valid_states(&self) -> Option<&[State]> {
        self.states.as_deref()
    }

    async fn on_command(
        &self,
        _session: &mut Session,
        request: &Request,
    ) -> HandlerResult<Option<Response>> {
        self.log.push(format!("{}:{}", self.name, request.command()));
        self.behavior.run(self.name)
    }
}

/// Connect handler.
pub struct Greeter {
    pub name: &'static str,
    pub behavior: Behavior,
    pub delay: Option<Duration>,
    pub log: EventLog,
}

impl Greeter {
    pub fn new(name: &'static str, behavior: Behavior, log: &EventLog) -> Self {
        Self {
            name,
            behavior,
            delay: None,
            log: log.clone(),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ProtocolHandler for Greeter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_connect(self: Arc<Self>) -> Option<Arc<dyn ConnectHandler>> {
        Some(self)
    }
}

#[async_trait]
impl ConnectHandler for Greeter {
    async fn on_connect(&self, _session: &mut Session) -> HandlerResult<Option<Response>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.push(self.name);
        self.behavior.run(self.name)
    }
}

/// Disconnect handler.
pub struct Farewell {
    pub name: &'static str,
    pub fail: bool,
    pub log: EventLog,
}

impl Farewell {
    pub fn new(name: &'static str, fail: bool, log: &EventLog) -> Self {
        Self {
            name,
            fail,
            log: log.clone(),
        }
    }
}

impl ProtocolHandler for Farewell {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_disconnect(self: Arc<Self>) -> Option<Arc<dyn DisconnectHandler>> {
        Some(self)
    }
}

#[async_trait]
impl DisconnectHandler for Farewell {
    async fn on_disconnect(&self, _session: &mut Session) -> HandlerResult<()> {
        self.log.push(self.name);
        if self.fail {
            return Err(HandlerError::Internal(format!("{} failed", self.name)));
        }
        Ok(())
    }
}

/// Connect result decorator.
///
/// Records `name(handler, previous text)` and, when `rewrite` is set,
/// replaces the outcome with it. With `panics` set it records and panics.
pub struct Stamp {
    pub name: &'static str,
    pub rewrite: Option<Response>,
    pub panics: bool,
    pub log: EventLog,
}

impl Stamp {
    pub fn observe(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            rewrite: None,
            panics: false,
            log: log.clone(),
        }
    }

    pub fn rewrite(name: &'static str, response: Response, log: &EventLog) -> Self {
        Self {
            rewrite: Some(response),
            ..Self::observe(name, log)
        }
    }

    pub fn panicking(name: &'static str, log: &EventLog) -> Self {
        Self {
            panics: true,
            ..Self::observe(name, log)
        }
    }
}

impl ProtocolHandler for Stamp {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_connect_result(self: Arc<Self>) -> Option<Arc<dyn ConnectHandlerResultHandler>> {
        Some(self)
    }
}

impl ConnectHandlerResultHandler for Stamp {
    fn on_response(
        &self,
        _session: &mut Session,
        response: Option<Response>,
        _elapsed: Duration,
        handler: &dyn ConnectHandler,
    ) -> Option<Response> {
        let previous = response.as_ref().map_or("-", Response::text).to_string();
        self.log
            .push(format!("{}({}, {})", self.name, handler.name(), previous));
        if self.panics {
            panic!("{} panicked", self.name);
        }
        match &self.rewrite {
            Some(rewrite) => Some(rewrite.clone()),
            None => response,
        }
    }
}

/// Connect result decorator that records the elapsed time it is given,
/// then blocks for `delay` before passing the outcome on.
pub struct Clock {
    pub name: &'static str,
    pub delay: Duration,
    pub seen: Mutex<Vec<Duration>>,
}

impl Clock {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl ProtocolHandler for Clock {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_connect_result(self: Arc<Self>) -> Option<Arc<dyn ConnectHandlerResultHandler>> {
        Some(self)
    }
}

impl ConnectHandlerResultHandler for Clock {
    fn on_response(
        &self,
        _session: &mut Session,
        response: Option<Response>,
        elapsed: Duration,
        _handler: &dyn ConnectHandler,
    ) -> Option<Response> {
        self.seen.lock().push(elapsed);
        std::thread::sleep(self.delay);
        response
    }
}

/// Disconnect result decorator that records completion flags.
pub struct Tally {
    pub name: &'static str,
    pub log: EventLog,
}

impl Tally {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl ProtocolHandler for Tally {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_disconnect_result(self: Arc<Self>) -> Option<Arc<dyn DisconnectHandlerResultHandler>> {
        Some(self)
    }
}

impl DisconnectHandlerResultHandler for Tally {
    fn on_response(
        &self,
        _session: &mut Session,
        completed: bool,
        _elapsed: Duration,
        handler: &dyn DisconnectHandler,
    ) -> bool {
        self.log
            .push(format!("{}({}, {})", self.name, handler.name(), completed));
        completed
    }
}

/// Extensible handler that remembers the names it was wired with.
pub struct Watcher {
    pub kinds: Vec<ExtensionKind>,
    pub seen: Mutex<Vec<(ExtensionKind, Vec<&'static str>)>>,
    pub reject_empty: bool,
}

impl Watcher {
    pub fn new(kinds: &[ExtensionKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            seen: Mutex::new(Vec::new()),
            reject_empty: false,
        }
    }
}

impl ProtocolHandler for Watcher {
    fn name(&self) -> &'static str {
        "watcher"
    }

    fn as_extensible(self: Arc<Self>) -> Option<Arc<dyn ExtensibleHandler>> {
        Some(self)
    }
}

impl ExtensibleHandler for Watcher {
    fn extension_kinds(&self) -> &[ExtensionKind] {
        &self.kinds
    }

    fn wire_extensions(
        &self,
        kind: ExtensionKind,
        extensions: &[Arc<dyn ProtocolHandler>],
    ) -> Result<(), WiringError> {
        if self.reject_empty && extensions.is_empty() {
            return Err(WiringError::Extension {
                handler: self.name(),
                kind,
                reason: "nothing to watch".to_string(),
            });
        }
        let names = extensions.iter().map(|h| h.name()).collect();
        self.seen.lock().push((kind, names));
        Ok(())
    }
}
