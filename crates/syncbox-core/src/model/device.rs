// ── Device view (`/device`) ──

use serde::{Deserialize, Serialize};

/// Identity and firmware of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Friendly name.
    pub name: String,
    pub device_type: String,
    /// 12 upper-case hex characters. Also the certificate common name.
    pub unique_id: String,
    pub ip_address: String,
    pub api_level: u32,
    /// `major.minor.maintenance`, optionally followed by more text.
    pub firmware_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<Wifi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_mode: Option<u8>,
}

/// Wireless uplink, absent on wired setups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wifi {
    pub ssid: String,
    /// 0 (none) to 4 (excellent).
    pub strength: u8,
}
