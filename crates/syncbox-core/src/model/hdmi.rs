// ── HDMI view (`/hdmi`) ──
//
// The box has four inputs and one output. Each port key is optional: a
// missing key means the firmware has not reported that port yet.

use serde::{Deserialize, Serialize};

/// One of the four HDMI inputs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HdmiInput {
    Input1,
    Input2,
    Input3,
    Input4,
}

/// HDMI state of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hdmi {
    /// Content specs of the active input, e.g. `3840 x 2160 @ 60000 - HDR10`.
    pub content_specs: String,
    pub video_sync_supported: bool,
    pub audio_sync_supported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input1: Option<HdmiPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input2: Option<HdmiPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input3: Option<HdmiPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input4: Option<HdmiPort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<HdmiPort>,
}

/// An HDMI input or the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdmiPort {
    pub name: String,
    /// Device type reported over CEC, e.g. `game`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `unplugged`, `plugged`, `linked` or `unknown`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_mode: Option<String>,
}

impl Hdmi {
    pub fn input(&self, input: HdmiInput) -> Option<&HdmiPort> {
        match input {
            HdmiInput::Input1 => self.input1.as_ref(),
            HdmiInput::Input2 => self.input2.as_ref(),
            HdmiInput::Input3 => self.input3.as_ref(),
            HdmiInput::Input4 => self.input4.as_ref(),
        }
    }

    /// Inputs that have been reported, in port order.
    pub fn inputs(&self) -> impl Iterator<Item = (HdmiInput, &HdmiPort)> {
        use strum::IntoEnumIterator;

        HdmiInput::iter().filter_map(|input| self.input(input).map(|port| (input, port)))
    }
}
