//! Temperature sensor collection

use mcp_common::{ToolError, ToolResult};
use sysinfo::Components;

use super::round2;
use crate::types::{Sensor, TemperatureInfo};

pub fn get_temperature_info() -> ToolResult<TemperatureInfo> {
    let components = Components::new_with_refreshed_list();

    let sensors: Vec<Sensor> = components
        .list()
        .iter()
        .filter_map(|c| sensor(c.label(), c.temperature(), c.max(), c.critical()))
        .collect();

    if sensors.is_empty() {
        return Err(ToolError::not_available("No temperature sensors found"));
    }
    Ok(summarize(sensors))
}

/// A reading, unless the sensor reports garbage
pub fn sensor(label: &str, celsius: f32, max: f32, critical: Option<f32>) -> Option<Sensor> {
    let valid = |t: f32| t.is_finite() && t > -273.15;
    if !valid(celsius) {
        return None;
    }

    let max = if valid(max) { max.max(celsius) } else { celsius };

    Some(Sensor {
        label: label.to_string(),
        celsius: round2(celsius as f64),
        max_celsius: round2(max as f64),
        critical_celsius: critical.filter(|c| valid(*c) && *c > 0.0).map(|c| round2(c as f64)),
    })
}

pub fn summarize(sensors: Vec<Sensor>) -> TemperatureInfo {
    let max_celsius = sensors.iter().map(|s| s.celsius).reduce(f64::max);
    TemperatureInfo {
        sensors,
        max_celsius,
    }
}
