//! Extension resolution, run once when a chain is wired.
//!
//! A single scan over the full handler list sorts every handler into typed
//! tables. Decorators are collected chain-wide before binding, so a decorator
//! registered after its target still applies to it.

use super::{ConnectBinding, DisconnectBinding};
use crate::error::WiringError;
use crate::handler::{
    CommandHandler, ConnectHandler, ConnectHandlerResultHandler, DisconnectHandler,
    DisconnectHandlerResultHandler, ProtocolHandler,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Typed dispatch tables for a wired chain.
pub(super) struct Tables {
    pub commands: HashMap<String, Vec<Arc<dyn CommandHandler>>>,
    pub connect: Vec<ConnectBinding>,
    pub disconnect: Vec<DisconnectBinding>,
}

pub(super) fn resolve(handlers: &[Arc<dyn ProtocolHandler>]) -> Result<Tables, WiringError> {
    let mut commands: HashMap<String, Vec<Arc<dyn CommandHandler>>> = HashMap::new();
    let mut connect: Vec<Arc<dyn ConnectHandler>> = Vec::new();
    let mut disconnect: Vec<Arc<dyn DisconnectHandler>> = Vec::new();
    let mut connect_results: Vec<Arc<dyn ConnectHandlerResultHandler>> = Vec::new();
    let mut disconnect_results: Vec<Arc<dyn DisconnectHandlerResultHandler>> = Vec::new();

    for handler in handlers {
        if let Some(cmd) = Arc::clone(handler).as_command() {
            if cmd.commands().is_empty() {
                return Err(WiringError::NoCommands {
                    handler: cmd.name(),
                });
            }
            for name in cmd.commands() {
                commands
                    .entry(name.to_ascii_uppercase())
                    .or_default()
                    .push(Arc::clone(&cmd));
            }
        }
        if let Some(h) = Arc::clone(handler).as_connect() {
            connect.push(h);
        }
        if let Some(h) = Arc::clone(handler).as_disconnect() {
            disconnect.push(h);
        }
        if let Some(h) = Arc::clone(handler).as_connect_result() {
            connect_results.push(h);
        }
        if let Some(h) = Arc::clone(handler).as_disconnect_result() {
            disconnect_results.push(h);
        }
    }

    wire_extensible(handlers)?;

    let connect_results: Arc<[_]> = connect_results.into();
    let disconnect_results: Arc<[_]> = disconnect_results.into();

    let connect = connect
        .into_iter()
        .map(|handler| ConnectBinding {
            handler,
            decorators: Arc::clone(&connect_results),
        })
        .collect();
    let disconnect = disconnect
        .into_iter()
        .map(|handler| DisconnectBinding {
            handler,
            decorators: Arc::clone(&disconnect_results),
        })
        .collect();

    Ok(Tables {
        commands,
        connect,
        disconnect,
    })
}

/// Hand every extensible handler the handlers of each kind it asked for.
fn wire_extensible(handlers: &[Arc<dyn ProtocolHandler>]) -> Result<(), WiringError> {
    for handler in handlers {
        let Some(extensible) = Arc::clone(handler).as_extensible() else {
            continue;
        };
        for &kind in extensible.extension_kinds() {
            let extensions: Vec<Arc<dyn ProtocolHandler>> = handlers
                .iter()
                .filter(|candidate| kind.matches(candidate))
                .cloned()
                .collect();
            debug!(
                handler = extensible.name(),
                kind = %kind,
                count = extensions.len(),
                "Wiring extensions"
            );
            extensible.wire_extensions(kind, &extensions)?;
        }
    }
    Ok(())
}
