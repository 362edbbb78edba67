//! Per-connection session state.
//!
//! A [`Session`] is created when a connection is accepted and is owned by the
//! task serving that connection. Handlers never keep connection data in their
//! own fields; they read and write it here.
//!
//! ## State marker
//!
//! The current [`State`] is a protocol-defined name. The framework imposes no
//! transition table; command handlers declare the states they accept and move
//! the session along themselves.
//!
//! ## Typed store
//!
//! Arbitrary values are stored under [`StateKey`]s. A key carries the value's
//! type, so reads are checked without casts at call sites:
//!
//! ```
//! use linewise::{Session, State, StateKey};
//!
//! const DELETED: StateKey<Vec<u64>> = StateKey::new("deleted-uids");
//!
//! let mut session = Session::new(State::new("transaction"));
//! session.insert(&DELETED, vec![1, 3]);
//! session.get_mut(&DELETED).unwrap().push(7);
//! assert_eq!(session.get(&DELETED), Some(&vec![1, 3, 7]));
//! ```

use crate::telemetry::spans;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::net::SocketAddr;
use tracing::Span;
use uuid::Uuid;

/// A named protocol state, e.g. `"authorization"` or `"transaction"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(&'static str);

impl State {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Typed key into the session store.
pub struct StateKey<T> {
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _type: PhantomData,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateKey").field(&self.name).finish()
    }
}

/// State of one client connection.
pub struct Session {
    id: Uuid,
    peer: Option<SocketAddr>,
    user: Option<String>,
    state: State,
    values: HashMap<&'static str, Box<dyn Any + Send>>,
    span: Span,
}

impl Session {
    /// Create a session starting in `initial` state.
    pub fn new(initial: State) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            peer: None,
            user: None,
            state: initial,
            values: HashMap::new(),
            span: spans::session(&id, None),
        }
    }

    /// Create a session for a connection accepted from `peer`.
    pub fn with_peer(initial: State, peer: SocketAddr) -> Self {
        let mut session = Self::new(initial);
        session.peer = Some(peer);
        session.span = spans::session(&session.id, Some(&peer));
        session
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    #[inline]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn set_user(&mut self, user: Option<String>) {
        self.user = user;
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        tracing::trace!(parent: &self.span, from = %self.state, to = %state, "State transition");
        self.state = state;
    }

    /// The session's diagnostic span. Events logged inside it carry the
    /// session id and peer address.
    #[inline]
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn get<T: Any + Send>(&self, key: &StateKey<T>) -> Option<&T> {
        self.values.get(key.name)?.downcast_ref()
    }

    pub fn get_mut<T: Any + Send>(&mut self, key: &StateKey<T>) -> Option<&mut T> {
        self.values.get_mut(key.name)?.downcast_mut()
    }

    /// Store `value`, returning the previous value under this key if it had
    /// the same type.
    pub fn insert<T: Any + Send>(&mut self, key: &StateKey<T>, value: T) -> Option<T> {
        self.values
            .insert(key.name, Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn remove<T: Any + Send>(&mut self, key: &StateKey<T>) -> Option<T> {
        self.values
            .remove(key.name)
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn contains<T>(&self, key: &StateKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    /// Drop every stored value. The state marker is left untouched.
    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Tear down the session at connection close.
    pub(crate) fn close(&mut self) {
        tracing::debug!(parent: &self.span, values = self.values.len(), "Session closed");
        self.values.clear();
        self.user = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("user", &self.user)
            .field("state", &self.state)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
