//! Session configuration
//!
//! Loaded from a TOML file with serde defaults, then overridden field by field
//! from the environment. For a prefix of `SYSINFO_MCP`:
//!
//! 1. `SYSINFO_MCP_CONFIG` names a TOML file; otherwise `./sysinfo-mcp.toml`
//!    is used when present
//! 2. `SYSINFO_MCP_CALL_TIMEOUT_MS`, `SYSINFO_MCP_MAX_IN_FLIGHT`,
//!    `SYSINFO_MCP_MAX_LINE_BYTES`, `SYSINFO_MCP_SHUTDOWN_GRACE_MS` and
//!    `SYSINFO_MCP_READY_NOTIFICATION` override single fields
//!
//! Bad files or values are logged and skipped; the server always starts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::framer::DEFAULT_MAX_LINE_BYTES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound on one collaborator invocation
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Collaborators allowed to run at the same time
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Largest accepted request line
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    /// How long shutdown waits for in-flight calls before aborting them
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,

    /// Write a `notifications/ready` line once the session accepts requests
    #[serde(default = "default_ready_notification")]
    pub ready_notification: bool,
}

fn default_call_timeout_ms() -> u64 {
    4_000
}

fn default_max_in_flight() -> usize {
    16
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

fn default_shutdown_grace_ms() -> u64 {
    5_000
}

fn default_ready_notification() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout_ms(),
            max_in_flight: default_max_in_flight(),
            max_line_bytes: default_max_line_bytes(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
            ready_notification: default_ready_notification(),
        }
    }
}

impl SessionConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Load using `<prefix>_*` environment variables
    ///
    /// `prefix` is upper snake case (`SYSINFO_MCP`); the fallback file name is
    /// derived from it (`sysinfo-mcp.toml`).
    pub fn load(prefix: &str) -> Self {
        Self::load_with(prefix, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injectable variable lookup
    pub fn load_with(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::locate_file(prefix, &lookup)
            .and_then(|path| Self::from_file(&path))
            .unwrap_or_default();
        config.apply_overrides(prefix, &lookup);
        config.clamp();
        config
    }

    fn locate_file(prefix: &str, lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        if let Some(env_path) = lookup(&format!("{}_CONFIG", prefix)) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!("{}_CONFIG points to missing file: {}", prefix, env_path);
        }

        let local = PathBuf::from(format!("{}.toml", prefix.to_lowercase().replace('_', "-")));
        local.exists().then_some(local)
    }

    fn from_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };
        match toml::from_str::<SessionConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_overrides(&mut self, prefix: &str, lookup: &impl Fn(&str) -> Option<String>) {
        fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
                    None
                }
            }
        }

        let key = |name: &str| format!("{}_{}", prefix, name);

        let k = key("CALL_TIMEOUT_MS");
        if let Some(v) = parse(&k, lookup(&k)) {
            self.call_timeout_ms = v;
        }
        let k = key("MAX_IN_FLIGHT");
        if let Some(v) = parse(&k, lookup(&k)) {
            self.max_in_flight = v;
        }
        let k = key("MAX_LINE_BYTES");
        if let Some(v) = parse(&k, lookup(&k)) {
            self.max_line_bytes = v;
        }
        let k = key("SHUTDOWN_GRACE_MS");
        if let Some(v) = parse(&k, lookup(&k)) {
            self.shutdown_grace_ms = v;
        }
        let k = key("READY_NOTIFICATION");
        if let Some(v) = parse(&k, lookup(&k)) {
            self.ready_notification = v;
        }
    }

    fn clamp(&mut self) {
        self.call_timeout_ms = self.call_timeout_ms.max(1);
        self.max_in_flight = self.max_in_flight.max(1);
        self.max_line_bytes = self.max_line_bytes.max(1024);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::load_with("TEST_MCP_NONE", lookup(&[]));
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.call_timeout(), Duration::from_secs(4));
        assert!(config.ready_notification);
    }

    #[test]
    fn test_env_overrides() {
        let config = SessionConfig::load_with(
            "TEST_MCP",
            lookup(&[
                ("TEST_MCP_CALL_TIMEOUT_MS", "250"),
                ("TEST_MCP_MAX_IN_FLIGHT", "2"),
                ("TEST_MCP_READY_NOTIFICATION", "false"),
            ]),
        );
        assert_eq!(config.call_timeout_ms, 250);
        assert_eq!(config.max_in_flight, 2);
        assert!(!config.ready_notification);
        assert_eq!(config.shutdown_grace_ms, 5_000);
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let config = SessionConfig::load_with(
            "TEST_MCP",
            lookup(&[("TEST_MCP_MAX_IN_FLIGHT", "lots")]),
        );
        assert_eq!(config.max_in_flight, 16);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let config = SessionConfig::load_with(
            "TEST_MCP",
            lookup(&[
                ("TEST_MCP_CALL_TIMEOUT_MS", "0"),
                ("TEST_MCP_MAX_IN_FLIGHT", "0"),
            ]),
        );
        assert_eq!(config.call_timeout_ms, 1);
        assert_eq!(config.max_in_flight, 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SessionConfig = toml::from_str("call_timeout_ms = 900\n").unwrap();
        assert_eq!(config.call_timeout_ms, 900);
        assert_eq!(config.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
    }

    #[test]
    fn test_config_file_from_env_path() {
        let path = std::env::temp_dir()
            .join(format!("mcp-common-config-{}.toml", std::process::id()));
        std::fs::write(&path, "max_in_flight = 3\nready_notification = false\n").unwrap();

        let config = SessionConfig::load_with(
            "TEST_MCP",
            lookup(&[("TEST_MCP_CONFIG", path.to_str().unwrap())]),
        );
        std::fs::remove_file(&path).ok();

        assert_eq!(config.max_in_flight, 3);
        assert!(!config.ready_notification);
    }
}
