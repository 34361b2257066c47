//! System identity types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIdentity {
    pub hostname: String,
    pub username: String,
    /// Stable machine identifier (`/etc/machine-id` on Linux)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    pub platform: String,
    pub arch: String,
    pub os_name: String,
    pub os_version: String,
}
