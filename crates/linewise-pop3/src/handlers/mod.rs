//! POP3 handlers, grouped by protocol phase.

mod auth;
mod quit;
mod transaction;
mod welcome;

pub use auth::{PassCmdHandler, UserCmdHandler};
pub use quit::QuitCmdHandler;
pub use transaction::{DeleCmdHandler, NoopCmdHandler, RsetCmdHandler};
pub use welcome::WelcomeMessageHandler;
