//! Integration tests for command dispatch through a wired chain.

mod common;

use common::{Behavior, Command, EventLog, READY, TRANSACTION};
use linewise::{
    ChainBuilder, CommandHandler, HandlerResult, ProtocolHandler, Replies, Request, Response,
    Session, State, Status,
};
use std::sync::Arc;

fn ok(text: &'static str) -> Behavior {
    Behavior::Respond(Response::ok(text))
}

#[tokio::test]
async fn first_response_wins_in_chain_order() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("first", "QUIT", ok("one"), &log))
        .add(Command::new("second", "QUIT", ok("two"), &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("QUIT"))
        .await;

    assert_eq!(response.text(), "one");
    assert_eq!(log.events(), vec!["first:QUIT"]);
}

#[tokio::test]
async fn declining_handler_passes_to_next() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("skip", "QUIT", Behavior::Pass, &log))
        .add(Command::new("answer", "QUIT", ok("bye"), &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("quit"))
        .await;

    assert_eq!(response.text(), "bye");
    assert_eq!(log.events(), vec!["skip:QUIT", "answer:QUIT"]);
}

#[tokio::test]
async fn state_gating_skips_ineligible_handlers() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("auth", "QUIT", ok("signing off"), &log).in_states(&[READY]))
        .add(Command::new("txn", "QUIT", ok("committed"), &log).in_states(&[TRANSACTION]));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(TRANSACTION);
    let response = chain
        .dispatch(&mut session, &Request::command_only("QUIT"))
        .await;

    assert_eq!(response.text(), "committed");
    assert_eq!(log.events(), vec!["txn:QUIT"]);
}

#[tokio::test]
async fn no_eligible_handler_is_invalid_state() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder.add(Command::new("dele", "DELE", ok("deleted"), &log).in_states(&[TRANSACTION]));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::new("DELE", Some("1".to_string())))
        .await;

    assert_eq!(response.status(), Status::Err);
    assert_eq!(response.text(), "Command DELE not valid in state ready");
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn unregistered_command_is_unknown() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder.add(Command::new("quit", "QUIT", ok("bye"), &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("XYZZY"))
        .await;

    assert_eq!(response.text(), "Unknown command XYZZY");
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn handler_error_becomes_server_error() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("broken", "STAT", Behavior::Fail, &log))
        .add(Command::new("never", "STAT", ok("unreachable"), &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("STAT"))
        .await;

    assert_eq!(response.status(), Status::Err);
    assert_eq!(response.text(), "Internal server error");
    assert!(!response.ends_session());
    assert_eq!(log.events(), vec!["broken:STAT"]);
}

#[tokio::test]
async fn handler_panic_is_contained() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("boom", "STAT", Behavior::Panic, &log))
        .add(Command::new("quit", "QUIT", ok("bye"), &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("STAT"))
        .await;
    assert_eq!(response.text(), "Internal server error");

    // The chain keeps serving after a panic.
    let response = chain
        .dispatch(&mut session, &Request::command_only("QUIT"))
        .await;
    assert_eq!(response.text(), "bye");
}

#[tokio::test]
async fn all_handlers_declining_is_server_error() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Command::new("a", "LIST", Behavior::Pass, &log))
        .add(Command::new("b", "LIST", Behavior::Pass, &log));
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("LIST"))
        .await;

    assert_eq!(response.text(), "Internal server error");
    assert_eq!(log.events(), vec!["a:LIST", "b:LIST"]);
}

struct Terse;

impl Replies for Terse {
    fn unknown_command(&self, _request: &Request) -> Response {
        Response::err("what?")
    }
}

#[tokio::test]
async fn protocol_replies_replace_defaults() {
    let mut builder = ChainBuilder::new();
    builder.replies(Terse);
    let chain = builder.wire().unwrap();

    let mut session = Session::new(READY);
    let response = chain
        .dispatch(&mut session, &Request::command_only("HELO"))
        .await;
    assert_eq!(response.text(), "what?");
}

/// Moves the session to the transaction state.
struct Login;

impl ProtocolHandler for Login {
    fn as_command(self: Arc<Self>) -> Option<Arc<dyn CommandHandler>> {
        Some(self)
    }
}

#[async_trait::async_trait]
impl CommandHandler for Login {
    fn commands(&self) -> &[&'static str] {
        &["PASS"]
    }

    fn valid_states(&self) -> Option<&[State]> {
        Some(&[READY])
    }

    async fn on_command(
        &self,
        session: &mut Session,
        _request: &Request,
    ) -> HandlerResult<Option<Response>> {
        session.set_state(TRANSACTION);
        Ok(Some(Response::ok("logged in")))
    }
}

#[tokio::test]
async fn handlers_drive_state_between_requests() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder
        .add(Login)
        .add(Command::new("dele", "DELE", ok("deleted"), &log).in_states(&[TRANSACTION]));
    let chain = Arc::new(builder.wire().unwrap());

    let mut session = Session::new(READY);
    let early = chain
        .dispatch(&mut session, &Request::command_only("DELE"))
        .await;
    assert_eq!(early.status(), Status::Err);

    chain
        .dispatch(&mut session, &Request::command_only("PASS"))
        .await;
    let late = chain
        .dispatch(&mut session, &Request::command_only("DELE"))
        .await;
    assert_eq!(late.text(), "deleted");
}

#[tokio::test]
async fn sessions_share_one_chain_across_tasks() {
    let log = EventLog::new();
    let mut builder = ChainBuilder::new();
    builder.add(Login);
    builder.add(Command::new("noop", "NOOP", ok(""), &log).in_states(&[TRANSACTION]));
    let chain = Arc::new(builder.wire().unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let chain = Arc::clone(&chain);
            tokio::spawn(async move {
                let mut session = Session::new(READY);
                chain
                    .dispatch(&mut session, &Request::command_only("PASS"))
                    .await;
                chain
                    .dispatch(&mut session, &Request::command_only("NOOP"))
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().status(), Status::Ok);
    }
    assert_eq!(log.events().len(), 8);
}
