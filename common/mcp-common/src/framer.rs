//! Line framing for the stdio transport
//!
//! Input arrives in chunks at arbitrary boundaries. [`LineFramer`] keeps one
//! pending fragment across chunks and yields every complete line, so a
//! request split across reads (down to one byte at a time) decodes exactly as
//! if it had arrived whole. Framing works on bytes; a multibyte character split
//! between chunks is reassembled before UTF-8 decoding.

use serde_json::Value;

use crate::error::{FrameError, RpcError};
use crate::protocol::{Request, RequestId};

/// Default cap on a single pending line
pub const DEFAULT_MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// Splits a byte stream into newline-terminated lines
#[derive(Debug)]
pub struct LineFramer {
    pending: Vec<u8>,
    max_line_bytes: usize,
    /// Set after an oversized line; bytes are dropped until the next newline
    discarding: bool,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

impl LineFramer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            discarding: false,
        }
    }

    /// Bytes currently buffered for the incomplete trailing line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feed one chunk and collect every line it completes
    ///
    /// Blank lines are skipped. A trailing `\r` is stripped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String, FrameError>> {
        let mut out = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            rest = &tail[1..];

            if self.discarding {
                self.discarding = false;
                self.pending.clear();
                continue;
            }

            if self.pending.len() + head.len() > self.max_line_bytes {
                self.pending.clear();
                out.push(Err(FrameError::LineTooLong {
                    limit: self.max_line_bytes,
                }));
                continue;
            }

            self.pending.extend_from_slice(head);
            let raw = std::mem::take(&mut self.pending);
            if let Some(line) = Self::finish_line(raw) {
                out.push(line);
            }
        }

        if !rest.is_empty() && !self.discarding {
            if self.pending.len() + rest.len() > self.max_line_bytes {
                self.pending.clear();
                self.discarding = true;
                out.push(Err(FrameError::LineTooLong {
                    limit: self.max_line_bytes,
                }));
            } else {
                self.pending.extend_from_slice(rest);
            }
        }

        out
    }

    /// Close the stream, reporting any unterminated fragment
    pub fn finish(&mut self) -> Option<FrameError> {
        let leftover = std::mem::take(&mut self.pending);
        self.discarding = false;
        let trimmed = leftover.iter().filter(|b| !b.is_ascii_whitespace()).count();
        (trimmed > 0).then(|| FrameError::Truncated {
            len: leftover.len(),
        })
    }

    fn finish_line(mut raw: Vec<u8>) -> Option<Result<String, FrameError>> {
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return None;
        }
        Some(String::from_utf8(raw).map_err(|e| {
            let line = String::from_utf8_lossy(e.as_bytes()).into_owned();
            FrameError::Unparseable {
                line,
                reason: "invalid UTF-8".to_string(),
            }
        }))
    }
}

// ============================================================================
// Message Decoding
// ============================================================================

/// Outcome of decoding one framed line
#[derive(Debug)]
pub enum Decoded {
    /// A well-formed request or notification
    Request(Request),
    /// Valid JSON that is not a valid request, but carries an id we can answer
    Invalid { id: RequestId, error: RpcError },
    /// Not protocol traffic; report and move on
    Diagnostic(FrameError),
}

/// Parse one line into a JSON-RPC request
pub fn decode_line(line: &str) -> Decoded {
    let value: Value = match serde_json::from_str(line.trim()) {
        Ok(value) => value,
        Err(e) => {
            return Decoded::Diagnostic(FrameError::Unparseable {
                line: line.to_string(),
                reason: e.to_string(),
            })
        }
    };

    let recovered_id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

    match serde_json::from_value::<Request>(value) {
        Ok(request) => Decoded::Request(request),
        Err(e) => match recovered_id {
            Some(id) => Decoded::Invalid {
                id,
                error: RpcError::invalid_request(format!("Invalid request: {}", e)),
            },
            None => Decoded::Diagnostic(FrameError::Unparseable {
                line: line.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}
