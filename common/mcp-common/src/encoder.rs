//! Response encoding and the single-writer output task
//!
//! Every outbound message is serialized to one compact JSON line. JSON string
//! escaping guarantees no raw `\n` inside the line, so the peer can always
//! delimit by newline. All lines go through one writer task fed by a channel,
//! which keeps concurrently finishing responses from interleaving bytes.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::SessionError;
use crate::protocol::{Notification, Response};

/// Channel depth between dispatch tasks and the writer
const OUTBOUND_CAPACITY: usize = 64;

/// A message headed for the protocol channel
#[derive(Debug, Clone)]
pub enum Outbound {
    Response(Response),
    Notification(Notification),
}

impl From<Response> for Outbound {
    fn from(response: Response) -> Self {
        Outbound::Response(response)
    }
}

impl From<Notification> for Outbound {
    fn from(notification: Notification) -> Self {
        Outbound::Notification(notification)
    }
}

/// Serialize a message as one newline-terminated line
pub fn encode_line<T: Serialize>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    Ok(line)
}

fn encode_outbound(message: &Outbound) -> Result<Vec<u8>, serde_json::Error> {
    match message {
        Outbound::Response(r) => encode_line(r),
        Outbound::Notification(n) => encode_line(n),
    }
}

/// Cloneable handle used by dispatch tasks to queue output
#[derive(Debug, Clone)]
pub struct ResponseSink {
    tx: mpsc::Sender<Outbound>,
}

impl ResponseSink {
    /// Queue a message. Returns `false` when the writer has gone away.
    pub async fn send(&self, message: impl Into<Outbound>) -> bool {
        self.tx.send(message.into()).await.is_ok()
    }
}

/// Spawn the writer task over `writer`
///
/// The task ends when every [`ResponseSink`] is dropped and the queue is
/// drained, or on the first write failure.
pub fn spawn_writer<W>(writer: W) -> (ResponseSink, JoinHandle<Result<u64, SessionError>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
    let handle = tokio::spawn(write_loop(writer, rx));
    (ResponseSink { tx }, handle)
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::Receiver<Outbound>) -> Result<u64, SessionError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;

    while let Some(message) = rx.recv().await {
        let line = match encode_outbound(&message) {
            Ok(line) => line,
            Err(e) => {
                // Serializing our own types only fails on non-string map keys,
                // which the protocol types never produce.
                error!(error = %e, "Failed to serialize outbound message");
                continue;
            }
        };

        writer.write_all(&line).await.map_err(SessionError::Write)?;
        writer.flush().await.map_err(SessionError::Write)?;
        written += 1;

        if let Outbound::Response(r) = &message {
            debug!(id = ?r.id, bytes = line.len(), "Sent response");
        }
    }

    writer.flush().await.map_err(SessionError::Write)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CallToolResult, Content};
    use serde_json::json;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_encoded_line_has_single_trailing_newline() {
        let payload = "line one\nline two\r\n";
        let result = CallToolResult {
            content: vec![Content::text(payload)],
            is_error: false,
        };
        let resp = Response::success(Some(1.into()), serde_json::to_value(&result).unwrap());
        let line = encode_line(&resp).unwrap();

        assert_eq!(line.last(), Some(&b'\n'));
        assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
        assert!(!line.contains(&b'\r'));

        let back: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(back["result"]["content"][0]["text"], payload);
    }

    #[tokio::test]
    async fn test_concurrent_senders_never_interleave() {
        let (client, server) = tokio::io::duplex(64);
        let (sink, handle) = spawn_writer(server);

        let mut tasks = Vec::new();
        for i in 0..20i64 {
            let sink = sink.clone();
            tasks.push(tokio::spawn(async move {
                let big = "x".repeat(500 + i as usize);
                sink.send(Response::success(Some(i.into()), json!({ "blob": big })))
                    .await
            }));
        }
        drop(sink);

        let reader = tokio::spawn(async move {
            let mut client = client;
            let mut out = String::new();
            client.read_to_string(&mut out).await.unwrap();
            out
        });

        for t in tasks {
            assert!(t.await.unwrap());
        }
        assert_eq!(handle.await.unwrap().unwrap(), 20);

        let out = reader.await.unwrap();
        let mut ids: Vec<i64> = out
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["id"].as_i64().unwrap()
            })
            .collect();
        ids.sort();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_writer_reports_broken_pipe() {
        let (client, server) = tokio::io::duplex(16);
        drop(client);
        let (sink, handle) = spawn_writer(server);
        sink.send(Response::success(Some(1.into()), json!({}))).await;
        drop(sink);
        assert!(matches!(handle.await.unwrap(), Err(SessionError::Write(_))));
    }
}
