//! Temperature sensor types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureInfo {
    pub sensors: Vec<Sensor>,
    /// Hottest current reading across all sensors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_celsius: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub label: String,
    pub celsius: f64,
    /// Highest reading seen by the OS since boot
    pub max_celsius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_celsius: Option<f64>,
}
