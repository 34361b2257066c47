//! CPU information collection

use mcp_common::ToolResult;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::{blocking, round2};
use crate::types::{CpuCore, CpuInfo};

/// Sample CPU hardware information and usage
///
/// Usage needs two refreshes separated by sysinfo's minimum interval. Both
/// refreshes read procfs/sysfs and run on the blocking pool; the wait between
/// them does not hold a thread.
pub async fn get_cpu_info(include_per_core: bool) -> ToolResult<CpuInfo> {
    let mut sys = blocking(|| {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        Ok(sys)
    })
    .await?;
    tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    blocking(move || {
        sys.refresh_cpu_all();
        Ok(cpu_info(&sys, include_per_core))
    })
    .await
}

/// Build [`CpuInfo`] from an already refreshed `System`
pub fn cpu_info(sys: &System, include_per_core: bool) -> CpuInfo {
    let cpus = sys.cpus();
    let first_cpu = cpus.first();

    let per_core = include_per_core.then(|| {
        cpus.iter()
            .map(|cpu| CpuCore {
                name: cpu.name().to_string(),
                frequency_mhz: cpu.frequency(),
                usage: round2(cpu.cpu_usage() as f64),
            })
            .collect()
    });

    let brand = first_cpu
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    CpuInfo {
        brand,
        vendor: first_cpu
            .map(|c| c.vendor_id().to_string())
            .unwrap_or_default(),
        cores: cpus.len(),
        physical_cores: sys.physical_core_count(),
        speed: mhz_to_ghz(first_cpu.map(|c| c.frequency()).unwrap_or(0)),
        usage: round2(sys.global_cpu_usage() as f64),
        per_core,
    }
}

fn mhz_to_ghz(mhz: u64) -> f64 {
    round2(mhz as f64 / 1000.0)
}
