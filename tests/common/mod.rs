//! Integration test common infrastructure.
//!
//! Provides recording handlers whose behaviour is chosen per test, plus a
//! shared event log for asserting on execution order.

pub mod handlers;

#[allow(unused_imports)]
pub use handlers::{Behavior, Clock, Command, Farewell, Greeter, Stamp, Tally, Watcher};

use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered record of what ran.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Initial state for test sessions.
#[allow(dead_code)]
pub const READY: linewise::State = linewise::State::new("ready");
#[allow(dead_code)]
pub const TRANSACTION: linewise::State = linewise::State::new("transaction");
