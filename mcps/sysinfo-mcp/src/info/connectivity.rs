//! Internet connectivity check
//!
//! Opens TCP connections to well-known public resolvers and resolves a
//! hostname, all concurrently and each bounded by the probe timeout.

use std::time::Duration;

use mcp_common::ToolResult;
use tokio::net::{lookup_host, TcpStream};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::types::{ConnectivityCheck, ConnectivityInfo};

const PROBE_TARGETS: &[&str] = &["1.1.1.1:53", "8.8.8.8:53"];
const DNS_PROBE_HOST: &str = "example.com:443";

pub const DEFAULT_TIMEOUT_MS: u64 = 1_500;
pub const MAX_TIMEOUT_MS: u64 = 3_000;
const MIN_TIMEOUT_MS: u64 = 100;

pub async fn check_internet_connectivity(timeout_ms: Option<u64>) -> ToolResult<ConnectivityInfo> {
    let timeout = Duration::from_millis(clamp_timeout(timeout_ms));

    let mut probes = JoinSet::new();
    for (i, target) in PROBE_TARGETS.iter().enumerate() {
        probes.spawn(async move { (i, probe(target, timeout).await) });
    }

    let (dns_resolved, mut results) = tokio::join!(resolve(DNS_PROBE_HOST, timeout), async {
        let mut results = Vec::with_capacity(PROBE_TARGETS.len());
        while let Some(joined) = probes.join_next().await {
            if let Ok(result) = joined {
                results.push(result);
            }
        }
        results
    });
    results.sort_by_key(|(i, _)| *i);

    Ok(summarize(
        results.into_iter().map(|(_, check)| check).collect(),
        dns_resolved,
    ))
}

pub fn clamp_timeout(timeout_ms: Option<u64>) -> u64 {
    timeout_ms
        .unwrap_or(DEFAULT_TIMEOUT_MS)
        .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
}

async fn probe(target: &str, timeout: Duration) -> ConnectivityCheck {
    let started = Instant::now();
    let (reachable, latency_ms, error) =
        match tokio::time::timeout(timeout, TcpStream::connect(target)).await {
            Ok(Ok(_stream)) => (true, Some(started.elapsed().as_millis() as u64), None),
            Ok(Err(e)) => (false, None, Some(e.to_string())),
            Err(_elapsed) => (
                false,
                None,
                Some(format!("timed out after {} ms", timeout.as_millis())),
            ),
        };

    ConnectivityCheck {
        target: target.to_string(),
        reachable,
        latency_ms,
        error,
    }
}

async fn resolve(host: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, lookup_host(host)).await {
        Ok(Ok(mut addrs)) => addrs.next().is_some(),
        _ => false,
    }
}

pub fn summarize(checks: Vec<ConnectivityCheck>, dns_resolved: bool) -> ConnectivityInfo {
    ConnectivityInfo {
        online: checks.iter().any(|c| c.reachable),
        dns_resolved,
        latency_ms: checks.iter().filter_map(|c| c.latency_ms).min(),
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(target: &str, latency_ms: Option<u64>) -> ConnectivityCheck {
        ConnectivityCheck {
            target: target.into(),
            reachable: latency_ms.is_some(),
            latency_ms,
            error: latency_ms.is_none().then(|| "unreachable".to_string()),
        }
    }

    #[test]
    fn test_clamp_timeout() {
        assert_eq!(clamp_timeout(None), DEFAULT_TIMEOUT_MS);
        assert_eq!(clamp_timeout(Some(0)), MIN_TIMEOUT_MS);
        assert_eq!(clamp_timeout(Some(60_000)), MAX_TIMEOUT_MS);
    }

    #[test]
    fn test_summarize_picks_fastest() {
        let info = summarize(vec![check("a", Some(40)), check("b", Some(12))], true);
        assert!(info.online);
        assert_eq!(info.latency_ms, Some(12));
    }

    #[test]
    fn test_summarize_offline() {
        let info = summarize(vec![check("a", None), check("b", None)], false);
        assert!(!info.online);
        assert!(!info.dns_resolved);
        assert_eq!(info.latency_ms, None);
    }

    #[tokio::test]
    async fn test_check_never_fails() {
        let info = check_internet_connectivity(Some(200)).await.unwrap();
        assert_eq!(info.checks.len(), PROBE_TARGETS.len());
        assert_eq!(info.checks[0].target, PROBE_TARGETS[0]);
    }
}
