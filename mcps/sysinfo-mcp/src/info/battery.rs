//! Battery information collection
//!
//! Reads the Linux power supply class. Drivers expose either energy (µWh,
//! `power_now`) or charge (µAh, `current_now`) attributes; both are handled.

use std::path::{Path, PathBuf};

use mcp_common::ToolResult;

use super::{linux_only, read_value, round2};
use crate::types::BatteryInfo;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// First battery's state; `hasBattery: false` on machines without one
pub fn get_battery_info() -> ToolResult<BatteryInfo> {
    if !cfg!(target_os = "linux") {
        return Err(linux_only("Battery information"));
    }
    Ok(read_batteries(Path::new(POWER_SUPPLY_DIR)))
}

pub fn read_batteries(root: &Path) -> BatteryInfo {
    let Ok(entries) = std::fs::read_dir(root) else {
        return BatteryInfo::default();
    };

    let mut batteries: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| read_value(p.join("type")).as_deref() == Some("Battery"))
        .collect();
    batteries.sort();

    match batteries.first() {
        Some(dir) => battery_from(|attr| read_value(dir.join(attr))),
        None => BatteryInfo::default(),
    }
}

/// Build [`BatteryInfo`] from attribute lookups
pub fn battery_from(attr: impl Fn(&str) -> Option<String>) -> BatteryInfo {
    let num = |name: &str| attr(name).and_then(|v| v.parse::<f64>().ok());

    let status = attr("status");
    let is_charging = status.as_deref().map(|s| s.eq_ignore_ascii_case("charging"));
    let discharging = status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("discharging"));

    let (now, full, design, rate) = match num("energy_now") {
        Some(now) => (
            Some(now),
            num("energy_full"),
            num("energy_full_design"),
            num("power_now"),
        ),
        None => (
            num("charge_now"),
            num("charge_full"),
            num("charge_full_design"),
            num("current_now"),
        ),
    };
    // some drivers report a negative current while discharging
    let rate = rate.map(f64::abs).filter(|r| *r > 0.0);

    let percent = num("capacity")
        .or_else(|| match (now, full) {
            (Some(n), Some(f)) if f > 0.0 => Some(n / f * 100.0),
            _ => None,
        })
        .map(|p| round2(p.clamp(0.0, 100.0)));

    let health = match (full, design) {
        (Some(f), Some(d)) if d > 0.0 => Some(round2(f / d * 100.0)),
        _ => None,
    };

    let time_remaining = match (now, full, rate) {
        (Some(n), _, Some(r)) if discharging => Some((n / r * 60.0).round() as u64),
        (Some(n), Some(f), Some(r)) if is_charging == Some(true) && f > n => {
            Some(((f - n) / r * 60.0).round() as u64)
        }
        _ => None,
    };

    BatteryInfo {
        has_battery: true,
        percent,
        is_charging,
        status,
        time_remaining,
        health,
        cycle_count: attr("cycle_count")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|c| *c > 0),
    }
}
