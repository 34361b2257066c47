//! System load collection

use mcp_common::ToolResult;
use sysinfo::System;

use super::round2;
use crate::types::SystemLoad;

pub fn get_system_load() -> ToolResult<SystemLoad> {
    let load = System::load_average();
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    Ok(system_load(load.one, load.five, load.fifteen, cpus))
}

pub fn system_load(one: f64, five: f64, fifteen: f64, cpu_count: usize) -> SystemLoad {
    let cpu_count = cpu_count.max(1);
    SystemLoad {
        load1: round2(one),
        load5: round2(five),
        load15: round2(fifteen),
        cpu_count,
        normalized_load1: round2(one / cpu_count as f64),
        supported: !cfg!(windows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_load() {
        let load = system_load(2.0, 1.5, 1.0, 4);
        assert_eq!(load.normalized_load1, 0.5);
        assert_eq!(load.cpu_count, 4);
    }

    #[test]
    fn test_zero_cpus_does_not_divide_by_zero() {
        let load = system_load(1.234, 0.0, 0.0, 0);
        assert_eq!(load.cpu_count, 1);
        assert_eq!(load.load1, 1.23);
        assert_eq!(load.normalized_load1, 1.23);
    }
}
