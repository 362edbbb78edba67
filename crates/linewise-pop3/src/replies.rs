use linewise::{Replies, Request, Response, State};

/// POP3 wording for replies produced by the chain itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pop3Replies;

impl Replies for Pop3Replies {
    fn unknown_command(&self, _request: &Request) -> Response {
        Response::err("Unknown command.")
    }

    fn invalid_state(&self, request: &Request, _state: State) -> Response {
        Response::err(format!("{} not allowed in this state", request.command()))
    }

    fn server_error(&self, _request: &Request) -> Response {
        Response::err("Unable to process request")
    }

    fn connect_failed(&self) -> Response {
        Response::err("Unable to process connection").end_session()
    }
}
