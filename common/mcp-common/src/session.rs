//! Stdio session loop
//!
//! Reads framed requests, dispatches each one on its own task and funnels
//! every response through the single writer. A slow tool never holds up the
//! requests behind it; responses go out in completion order and callers match
//! them by id.

use std::future::Future;
use std::io;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::dispatch::Dispatcher;
use crate::encoder::{spawn_writer, ResponseSink};
use crate::error::{FrameError, SessionError};
use crate::framer::{decode_line, Decoded, LineFramer};
use crate::protocol::{methods, Notification, Response};

const READ_CHUNK: usize = 8 * 1024;

/// Counters reported when a session ends cleanly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Requests and notifications handed to the dispatcher
    pub requests: u64,
    /// Lines that were reported and dropped
    pub diagnostics: u64,
    /// Lines written to the output
    pub lines_written: u64,
    /// Calls still running when the shutdown grace ran out
    pub aborted: usize,
}

/// Serve one session until EOF, `shutdown` resolving, or a transport failure
pub async fn serve<R, W, S>(
    dispatcher: Arc<Dispatcher>,
    config: &SessionConfig,
    mut reader: R,
    writer: W,
    shutdown: S,
) -> Result<SessionSummary, SessionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    S: Future<Output = ()>,
{
    let (sink, mut writer_task) = spawn_writer(writer);
    let mut framer = LineFramer::new(config.max_line_bytes);
    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut summary = SessionSummary::default();
    let mut buf = vec![0u8; READ_CHUNK];

    let mut read_error: Option<io::Error> = None;
    let mut writer_result = None;

    announce_ready(&dispatcher, config, &sink).await;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer reading input");
                break;
            }
            joined = &mut writer_task, if writer_result.is_none() => {
                writer_result = Some(flatten_writer(joined));
                error!("Output closed unexpectedly");
                break;
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    error!(error = %e, "Request task failed");
                }
            }
            read = reader.read(&mut buf) => match read {
                Ok(0) => {
                    if let Some(diag) = framer.finish() {
                        report(&diag, &mut summary);
                    }
                    info!("Input closed");
                    break;
                }
                Ok(n) => {
                    for frame in framer.push(&buf[..n]) {
                        handle_frame(frame, &dispatcher, &sink, &mut in_flight, &mut summary).await;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    error!(error = %e, "Failed to read input");
                    read_error = Some(e);
                    break;
                }
            },
        }
    }

    summary.aborted = drain(&mut in_flight, config).await;

    drop(sink);
    let written = match writer_result {
        Some(result) => result,
        None => flatten_writer(writer_task.await),
    };

    if let Some(e) = read_error {
        return Err(SessionError::Read(e));
    }
    summary.lines_written = written?;

    info!(
        requests = summary.requests,
        diagnostics = summary.diagnostics,
        lines_written = summary.lines_written,
        aborted = summary.aborted,
        "Session finished"
    );
    Ok(summary)
}

async fn announce_ready(dispatcher: &Dispatcher, config: &SessionConfig, sink: &ResponseSink) {
    let info = dispatcher.server_info();
    let tools = dispatcher.registry().len();
    info!(
        event = "ready",
        server = %info.name,
        version = %info.version,
        tools,
        "Server ready, waiting for requests"
    );

    if config.ready_notification {
        let params = json!({
            "server": info.name,
            "version": info.version,
            "tools": tools,
        });
        sink.send(Notification::new(methods::READY, Some(params))).await;
    }
}

async fn handle_frame(
    frame: Result<String, FrameError>,
    dispatcher: &Arc<Dispatcher>,
    sink: &ResponseSink,
    in_flight: &mut JoinSet<()>,
    summary: &mut SessionSummary,
) {
    let line = match frame {
        Ok(line) => line,
        Err(diag) => return report(&diag, summary),
    };

    match decode_line(&line) {
        Decoded::Request(request) => {
            summary.requests += 1;
            let dispatcher = Arc::clone(dispatcher);
            let sink = sink.clone();
            in_flight.spawn(async move {
                if let Some(response) = dispatcher.dispatch(request).await {
                    if !sink.send(response).await {
                        debug!("Dropping response, output is closed");
                    }
                }
            });
        }
        Decoded::Invalid { id, error } => {
            debug!(id = %id, message = %error.message, "Rejecting malformed request");
            sink.send(Response::error(Some(id), error)).await;
        }
        Decoded::Diagnostic(diag) => report(&diag, summary),
    }
}

fn report(diag: &FrameError, summary: &mut SessionSummary) {
    summary.diagnostics += 1;
    match diag {
        FrameError::Unparseable { line, reason } => {
            warn!(reason = %reason, line = %preview(line), "Ignoring unparseable line")
        }
        other => warn!("{}", other),
    }
}

/// First 120 characters of a line, for log output
fn preview(line: &str) -> String {
    match line.char_indices().nth(120) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

/// Wait for in-flight calls, aborting whatever outlives the grace period
async fn drain(in_flight: &mut JoinSet<()>, config: &SessionConfig) -> usize {
    if in_flight.is_empty() {
        return 0;
    }

    info!(pending = in_flight.len(), "Waiting for in-flight requests");
    let drained = tokio::time::timeout(config.shutdown_grace(), async {
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Request task failed");
            }
        }
    })
    .await
    .is_ok();

    if drained {
        return 0;
    }

    let aborted = in_flight.len();
    warn!(aborted, "Shutdown grace elapsed, aborting in-flight requests");
    in_flight.abort_all();
    while in_flight.join_next().await.is_some() {}
    aborted
}

fn flatten_writer(
    joined: Result<Result<u64, SessionError>, tokio::task::JoinError>,
) -> Result<u64, SessionError> {
    joined.map_err(|e| SessionError::Write(io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let line = "é".repeat(200);
        let p = preview(&line);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 123);
        assert_eq!(preview("short"), "short");
    }
}
