//! End-to-end session tests over in-memory pipes

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use mcp_common::{
    serve, Dispatcher, NoParams, ServerInfo, SessionConfig, SessionError, SessionSummary,
    ToolError, ToolRegistry,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::task::JoinHandle;

#[derive(Debug, Deserialize, JsonSchema)]
struct EchoParams {
    text: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SleepParams {
    ms: u64,
}

fn dispatcher(config: &SessionConfig) -> Arc<Dispatcher> {
    let registry = ToolRegistry::builder()
        .tool("echo", "Echo text back", |p: EchoParams| async move {
            Ok::<_, ToolError>(json!({ "text": p.text }))
        })
        .tool("sleep", "Sleep, then answer", |p: SleepParams| async move {
            tokio::time::sleep(Duration::from_millis(p.ms)).await;
            Ok::<_, ToolError>(json!({ "slept": p.ms }))
        })
        .tool("unavailable", "Always unavailable", |_: NoParams| async {
            Err::<Value, _>(ToolError::not_available("no such hardware"))
        })
        .build()
        .unwrap();

    let info = ServerInfo {
        name: "test-mcp".into(),
        version: "9.9.9".into(),
    };
    Arc::new(Dispatcher::from_config(registry, info, config))
}

fn quiet_config() -> SessionConfig {
    SessionConfig {
        ready_notification: false,
        ..SessionConfig::default()
    }
}

struct Harness {
    input: Option<DuplexStream>,
    output: Lines<BufReader<DuplexStream>>,
    session: JoinHandle<Result<SessionSummary, SessionError>>,
}

impl Harness {
    fn start(config: SessionConfig) -> Self {
        Self::start_with_shutdown(config, std::future::pending::<()>())
    }

    fn start_with_shutdown<S>(config: SessionConfig, shutdown: S) -> Self
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let (client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, client_out) = tokio::io::duplex(1024 * 1024);
        let d = dispatcher(&config);
        let session =
            tokio::spawn(async move { serve(d, &config, server_in, server_out, shutdown).await });

        Self {
            input: Some(client_in),
            output: BufReader::new(client_out).lines(),
            session,
        }
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        let input = self.input.as_mut().expect("input already closed");
        input.write_all(bytes).await.unwrap();
        input.flush().await.unwrap();
    }

    async fn send(&mut self, message: Value) {
        self.send_raw(format!("{}\n", message).as_bytes()).await;
    }

    async fn next_line(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.output.next_line())
            .await
            .expect("no output within 5s")
            .unwrap()
            .expect("output closed")
    }

    async fn next_message(&mut self) -> Value {
        serde_json::from_str(&self.next_line().await).unwrap()
    }

    /// Close input and collect everything written until the session ends
    async fn finish(mut self) -> (Vec<Value>, Result<SessionSummary, SessionError>) {
        self.input.take();
        let mut messages = Vec::new();
        while let Some(line) = self.output.next_line().await.unwrap() {
            messages.push(serde_json::from_str(&line).unwrap());
        }
        let result = self.session.await.unwrap();
        (messages, result)
    }
}

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn inner(response: &Value) -> Value {
    serde_json::from_str(response["result"]["content"][0]["text"].as_str().unwrap()).unwrap()
}

fn by_id(messages: &[Value], id: i64) -> Value {
    messages
        .iter()
        .find(|m| m["id"] == id)
        .cloned()
        .unwrap_or_else(|| panic!("no response for id {}", id))
}

#[tokio::test]
async fn test_request_split_across_chunks() {
    let mut h = Harness::start(quiet_config());
    let line = format!("{}\n", call(2, "echo", json!({ "text": "héllo" })));

    for chunk in line.as_bytes().chunks(3) {
        h.send_raw(chunk).await;
        tokio::task::yield_now().await;
    }

    let resp = h.next_message().await;
    assert_eq!(resp["id"], 2);
    assert_eq!(inner(&resp)["text"], "héllo");

    let (rest, summary) = h.finish().await;
    assert!(rest.is_empty());
    assert_eq!(summary.unwrap().requests, 1);
}

#[tokio::test]
async fn test_ids_are_echoed_byte_for_byte() {
    let mut h = Harness::start(quiet_config());

    for id in ["18446744073709551616", "1.10", r#""req-7""#] {
        h.send_raw(format!(r#"{{"jsonrpc":"2.0","id":{},"method":"ping"}}"#, id).as_bytes())
            .await;
        h.send_raw(b"\n").await;

        let line = h.next_line().await;
        assert_eq!(line, format!(r#"{{"jsonrpc":"2.0","id":{},"result":{{}}}}"#, id));
    }

    h.finish().await.1.unwrap();
}

#[tokio::test]
async fn test_fast_call_is_not_blocked_by_slow_call() {
    let mut h = Harness::start(quiet_config());
    h.send(call(10, "sleep", json!({ "ms": 400 }))).await;
    h.send(call(11, "echo", json!({ "text": "fast" }))).await;

    let first = h.next_message().await;
    assert_eq!(first["id"], 11);
    let second = h.next_message().await;
    assert_eq!(second["id"], 10);
    assert_eq!(inner(&second)["slept"], 400);

    let (_, summary) = h.finish().await;
    assert!(summary.is_ok());
}

#[tokio::test]
async fn test_timeout_then_still_responsive() {
    let config = SessionConfig {
        call_timeout_ms: 100,
        ..quiet_config()
    };
    let mut h = Harness::start(config);
    h.send(call(1, "sleep", json!({ "ms": 10_000 }))).await;

    let timed_out = h.next_message().await;
    assert_eq!(timed_out["id"], 1);
    assert_eq!(inner(&timed_out)["error"]["code"], "TIMEOUT");
    assert_eq!(timed_out["result"]["isError"], true);

    h.send(call(2, "echo", json!({ "text": "still here" }))).await;
    let resp = h.next_message().await;
    assert_eq!(resp["id"], 2);
    assert_eq!(inner(&resp)["text"], "still here");

    h.finish().await.1.unwrap();
}

#[tokio::test]
async fn test_unknown_tool_and_garbage_lines() {
    let mut h = Harness::start(quiet_config());
    h.send_raw(b"this is not json\n").await;
    h.send(call(3, "get_nothing", json!({}))).await;
    h.send(call(4, "unavailable", json!({}))).await;

    let (messages, summary) = h.finish().await;
    assert_eq!(messages.len(), 2);

    let unknown = by_id(&messages, 3);
    assert_eq!(unknown["error"]["code"], -32602);
    assert!(unknown.get("result").is_none());

    let unavailable = by_id(&messages, 4);
    assert_eq!(inner(&unavailable)["error"]["code"], "NOT_AVAILABLE");

    let summary = summary.unwrap();
    assert_eq!(summary.diagnostics, 1);
    assert_eq!(summary.requests, 2);
}

#[tokio::test]
async fn test_malformed_request_with_id_is_answered() {
    let mut h = Harness::start(quiet_config());
    h.send(json!({ "jsonrpc": "2.0", "id": 7 })).await;
    h.send(json!({ "jsonrpc": "2.0", "id": 8, "method": "resources/list" })).await;

    let (messages, _) = h.finish().await;
    assert_eq!(by_id(&messages, 7)["error"]["code"], -32600);
    assert_eq!(by_id(&messages, 8)["error"]["code"], -32601);
}

#[tokio::test]
async fn test_ready_notification_comes_first() {
    let mut h = Harness::start(SessionConfig::default());

    let ready = h.next_message().await;
    assert_eq!(ready["method"], "notifications/ready");
    assert!(ready.get("id").is_none());
    assert_eq!(ready["params"]["server"], "test-mcp");
    assert_eq!(ready["params"]["version"], "9.9.9");
    assert_eq!(ready["params"]["tools"], 3);

    h.send(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" })).await;
    let list = h.next_message().await;
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["echo", "sleep", "unavailable"]);

    h.finish().await.1.unwrap();
}

#[tokio::test]
async fn test_eof_waits_for_in_flight_calls() {
    let mut h = Harness::start(quiet_config());
    h.send(call(5, "sleep", json!({ "ms": 200 }))).await;

    let (messages, summary) = h.finish().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(inner(&messages[0])["slept"], 200);
    assert_eq!(summary.unwrap().aborted, 0);
}

#[tokio::test]
async fn test_grace_period_aborts_stragglers() {
    let config = SessionConfig {
        call_timeout_ms: 60_000,
        shutdown_grace_ms: 50,
        ..quiet_config()
    };
    let mut h = Harness::start(config);
    h.send(call(6, "sleep", json!({ "ms": 30_000 }))).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (messages, summary) = h.finish().await;
    assert!(messages.is_empty());
    assert_eq!(summary.unwrap().aborted, 1);
}

#[tokio::test]
async fn test_shutdown_signal_stops_reading() {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let mut h = Harness::start_with_shutdown(quiet_config(), async move {
        rx.await.ok();
    });

    h.send(call(1, "echo", json!({ "text": "before" }))).await;
    assert_eq!(h.next_message().await["id"], 1);

    tx.send(()).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(5), &mut h.session)
        .await
        .expect("session did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(summary.requests, 1);
}

#[tokio::test]
async fn test_oversized_line_is_skipped() {
    let config = SessionConfig {
        max_line_bytes: 1024,
        ..quiet_config()
    };
    let mut h = Harness::start(config);
    let huge = call(1, "echo", json!({ "text": "x".repeat(5_000) }));
    h.send(huge).await;
    h.send(call(2, "echo", json!({ "text": "small" }))).await;

    let (messages, summary) = h.finish().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"], 2);
    assert_eq!(summary.unwrap().diagnostics, 1);
}

#[tokio::test]
async fn test_crlf_and_blank_lines() {
    let mut h = Harness::start(quiet_config());
    let line = call(9, "echo", json!({ "text": "crlf" }));
    h.send_raw(format!("\n\r\n{}\r\n\n", line).as_bytes()).await;

    let (messages, summary) = h.finish().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(inner(&messages[0])["text"], "crlf");
    assert_eq!(summary.unwrap().diagnostics, 0);
}

#[tokio::test]
async fn test_truncated_fragment_is_not_dispatched() {
    let mut h = Harness::start(quiet_config());
    h.send_raw(br#"{"jsonrpc":"2.0","id":1,"method":"tools/li"#).await;

    let (messages, summary) = h.finish().await;
    assert!(messages.is_empty());
    assert_eq!(summary.unwrap().diagnostics, 1);
}

#[tokio::test]
async fn test_read_failure_ends_session_with_error() {
    let request = format!("{}\n", call(1, "echo", json!({ "text": "x" })));
    let reader = tokio_test::io::Builder::new()
        .read(request.as_bytes())
        .read_error(io::Error::new(io::ErrorKind::Other, "stdin went away"))
        .build();

    let config = quiet_config();
    let result = serve(
        dispatcher(&config),
        &config,
        reader,
        tokio::io::sink(),
        std::future::pending::<()>(),
    )
    .await;

    assert!(matches!(result, Err(SessionError::Read(_))));
}
