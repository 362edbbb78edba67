//! linewise - handler chains for line-oriented protocol servers.
//!
//! A protocol such as POP3 or SMTP is implemented as a pipeline of small,
//! independent handlers instead of one monolithic parser. This crate owns the
//! pipeline:
//!
//! - a [`ChainBuilder`] collects handlers during configuration;
//! - [`ChainBuilder::wire`] resolves decorators and extensions and freezes
//!   the pipeline into an immutable [`Chain`], shared by every connection;
//! - per connection, [`Chain::connect`], [`Chain::dispatch`] and
//!   [`Chain::disconnect`] run the right handlers against that connection's
//!   [`Session`], turning handler failures into protocol replies.
//!
//! Network I/O, line framing and command parsing belong to the embedding
//! server; it hands the chain already-parsed [`Request`]s and writes back the
//! [`Response`]s it gets.
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use linewise::{
//!     ChainBuilder, CommandHandler, HandlerResult, ProtocolHandler, Request, Response,
//!     Session, State,
//! };
//! use std::sync::Arc;
//!
//! const READY: State = State::new("ready");
//!
//! struct QuitHandler;
//!
//! impl ProtocolHandler for QuitHandler {
//!     fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
//!         Some(self)
//!     }
//! }
//!
//! #[async_trait]
//! impl CommandHandler for QuitHandler {
//!     fn commands(&self) -> &[&'static str] {
//!         &["QUIT"]
//!     }
//!
//!     async fn on_command(
//!         &self,
//!         _session: &mut Session,
//!         _request: &Request,
//!     ) -> HandlerResult<Option<Response>> {
//!         Ok(Some(Response::ok("bye").end_session()))
//!     }
//! }
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut builder = ChainBuilder::new();
//! builder.add(QuitHandler);
//! let chain = Arc::new(builder.wire().unwrap());
//!
//! let mut session = Session::new(READY);
//! let response = chain.dispatch(&mut session, &Request::command_only("quit")).await;
//! assert!(response.ends_session());
//! # });
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod session;
pub mod telemetry;

pub use chain::{
    Chain, ChainBuilder, ConnectBinding, ConnectResult, DisconnectBinding, SharedChain,
};
pub use config::{ConfigError, ProtocolConfig, ValidationError};
pub use error::{ChainError, HandlerError, HandlerResult, WiringError};
pub use handler::{
    CommandHandler, ConnectHandler, ConnectHandlerResultHandler, DisconnectHandler,
    DisconnectHandlerResultHandler, ExtensibleHandler, ExtensionKind, ProtocolHandler,
};
pub use request::Request;
pub use response::{DefaultReplies, Replies, Response, Status};
pub use session::{Session, State, StateKey};
