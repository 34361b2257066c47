//! Process information collection

use std::cmp::Ordering;

use mcp_common::{ToolError, ToolResult};
use sysinfo::{Pid, Process, System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::{blocking, lossy, percent, round2};
use crate::params::ProcessSort;
use crate::types::{ProcessInfo, ProcessList, ProcessSummary};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 500;

/// Take two process snapshots so per-process CPU usage is meaningful
async fn sample() -> ToolResult<System> {
    let mut sys = blocking(|| Ok(System::new_all())).await?;
    tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    blocking(move || {
        sys.refresh_all();
        Ok(sys)
    })
    .await
}

/// Details of one process; the server's own process when `pid` is `None`
pub async fn get_process_info(pid: Option<u32>) -> ToolResult<ProcessInfo> {
    let pid = match pid {
        Some(pid) => Pid::from_u32(pid),
        None => sysinfo::get_current_pid()
            .map_err(|e| ToolError::internal(format!("cannot determine own PID: {}", e)))?,
    };

    let sys = sample().await?;
    let process = sys
        .process(pid)
        .ok_or_else(|| ToolError::not_available(format!("No process with PID {}", pid)))?;

    Ok(process_info(process, sys.total_memory()))
}

pub fn process_info(process: &Process, total_memory: u64) -> ProcessInfo {
    ProcessInfo {
        pid: process.pid().as_u32(),
        parent_pid: process.parent().map(|p| p.as_u32()),
        name: lossy(process.name()),
        exe: process.exe().map(|p| p.display().to_string()),
        cwd: process.cwd().map(|p| p.display().to_string()),
        status: process.status().to_string(),
        cpu: round2(process.cpu_usage() as f64),
        memory_bytes: process.memory(),
        memory_percent: percent(process.memory(), total_memory),
        start_time: process.start_time(),
        run_time_seconds: process.run_time(),
    }
}

/// Top processes by `sort`
pub async fn list_processes(limit: Option<usize>, sort: ProcessSort) -> ToolResult<ProcessList> {
    let sys = sample().await?;
    let total_memory = sys.total_memory();

    let rows: Vec<ProcessSummary> = sys
        .processes()
        .values()
        .map(|p| ProcessSummary {
            pid: p.pid().as_u32(),
            name: lossy(p.name()),
            cpu: round2(p.cpu_usage() as f64),
            memory_percent: percent(p.memory(), total_memory),
            memory_bytes: p.memory(),
        })
        .collect();

    Ok(ProcessList {
        total: rows.len(),
        processes: sort_and_limit(rows, sort, clamp_limit(limit)),
    })
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Sort (cpu/memory descending, name/pid ascending, ties by pid) and truncate
pub fn sort_and_limit(
    mut rows: Vec<ProcessSummary>,
    sort: ProcessSort,
    limit: usize,
) -> Vec<ProcessSummary> {
    rows.sort_by(|a, b| compare(sort, a, b).then_with(|| a.pid.cmp(&b.pid)));
    rows.truncate(limit);
    rows
}

fn compare(sort: ProcessSort, a: &ProcessSummary, b: &ProcessSummary) -> Ordering {
    match sort {
        ProcessSort::Cpu => b.cpu.total_cmp(&a.cpu),
        ProcessSort::Memory => b.memory_bytes.cmp(&a.memory_bytes),
        ProcessSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProcessSort::Pid => Ordering::Equal,
    }
}
