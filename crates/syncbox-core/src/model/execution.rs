// ── Execution view (`/execution`) ──

use serde::{Deserialize, Serialize};

/// What the box is currently doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Lights are following the picture.
    pub sync_active: bool,
    /// HDMI passthrough is powered.
    pub hdmi_active: bool,
    /// `powersave`, `passthrough`, `video`, `game` or `music`.
    pub mode: String,
    /// Mode that `syncActive` returns to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_mode: Option<String>,
    /// `input1` .. `input4`.
    pub hdmi_source: String,
    /// Entertainment area, e.g. `groups/13`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue_target: Option<String>,
    /// 0..=200.
    pub brightness: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<SyncMode>,
}

/// Per-mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMode {
    /// `subtle`, `moderate`, `high` or `intense`.
    pub intensity: String,
}

impl Execution {
    /// Settings of the mode currently running, if it is a sync mode.
    pub fn current_sync_mode(&self) -> Option<&SyncMode> {
        match self.mode.as_str() {
            "video" => self.video.as_ref(),
            "game" => self.game.as_ref(),
            "music" => self.music.as_ref(),
            _ => None,
        }
    }
}
