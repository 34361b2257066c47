//! System information collection modules
//!
//! One module per tool. Collectors return domain data or a [`ToolError`];
//! they never panic on missing hardware or unreadable OS files. Collectors
//! doing synchronous OS reads run on the blocking pool through [`blocking`].

pub mod battery;
pub mod bluetooth;
mod command;
pub mod connectivity;
pub mod cpu;
pub mod disk;
pub mod environment;
pub mod hardware;
pub mod identity;
pub mod load;
pub mod memory;
pub mod network;
pub mod os;
pub mod ports;
pub mod process;
pub mod temperature;
pub mod uptime;
pub mod wifi;

use std::ffi::OsStr;
use std::path::Path;

use mcp_common::{ToolError, ToolResult};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Run a synchronous collector on the blocking pool
///
/// If the call times out the thread is left to finish and its result dropped.
pub async fn blocking<T, F>(f: F) -> ToolResult<T>
where
    F: FnOnce() -> ToolResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ToolError::internal(format!("collector task failed: {}", e)))?
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bytes to GiB, rounded
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

/// `part / total` in percent, 0 when `total` is 0
pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Read a sysfs/procfs style single-value file, trimmed; `None` if unreadable or empty
pub fn read_value(path: impl AsRef<Path>) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn lossy(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}

/// Platform family name (`linux`, `macos`, `windows`, ...)
pub fn platform() -> &'static str {
    std::env::consts::OS
}

/// Error for collectors that only exist on Linux
pub(crate) fn linux_only(what: &str) -> ToolError {
    ToolError::not_available(format!("{} is only supported on Linux", what))
}
