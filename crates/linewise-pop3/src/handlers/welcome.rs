use async_trait::async_trait;
use linewise::{ConnectHandler, HandlerResult, ProtocolConfig, ProtocolHandler, Response, Session};
use std::sync::Arc;

/// Sends the `+OK` greeting when a client connects.
#[derive(Debug, Clone)]
pub struct WelcomeMessageHandler {
    greeting: String,
}

impl WelcomeMessageHandler {
    pub fn new(config: &ProtocolConfig) -> Self {
        let greeting = match &config.greeting {
            Some(greeting) => greeting.clone(),
            None => format!(
                "{} POP3 server ({}) ready",
                config.hello_name, config.software_name
            ),
        };
        Self { greeting }
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }
}

impl ProtocolHandler for WelcomeMessageHandler {
    fn name(&self) -> &'static str {
        "pop3-welcome"
    }

    fn as_connect(self: Arc<Self>) -> Option<Arc<dyn ConnectHandler>> {
        Some(self)
    }
}

#[async_trait]
impl ConnectHandler for WelcomeMessageHandler {
    async fn on_connect(&self, _session: &mut Session) -> HandlerResult<Option<Response>> {
        Ok(Some(Response::ok(self.greeting.clone())))
    }
}
