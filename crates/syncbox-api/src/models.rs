// Partial-update payloads
//
// Every field is optional and omitted from the JSON when unset, so a PUT only
// touches the fields the caller named. Field names follow the device's
// camelCase wire names.

use serde::{Deserialize, Serialize};

/// Direction for the `cycle*` execution commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Cycle {
    Next,
    Previous,
}

/// Per-mode settings inside an execution update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncModeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
}

/// `PUT /execution` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_active: Option<bool>,
    /// Only sent when `true`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub toggle_sync_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdmi_active: Option<bool>,
    /// Only sent when `true`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub toggle_hdmi_active: bool,
    /// `powersave`, `passthrough`, `video`, `game`, `music`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_sync_mode: Option<Cycle>,
    /// `input1` .. `input4`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdmi_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_hdmi_source: Option<Cycle>,
    /// 0..=200, 100 leaves the input untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    /// -200..=200.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment_brightness: Option<i64>,
    /// `subtle`, `moderate`, `high`, `intense`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_intensity: Option<Cycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<SyncModeUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<SyncModeUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<SyncModeUpdate>,
    /// Entertainment area, e.g. `groups/13`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue_target: Option<String>,
}

/// One-shot device actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceAction {
    DoSoftwareRestart,
    DoFirmwareUpdate,
}

/// `PUT /device` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_mode: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DeviceAction>,
}

/// `PUT /behavior` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorUpdate {
    /// 0 disabled, 1 enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_dovi_native: Option<u8>,
}

/// `PUT /hue/groups/{id}` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
