// ── Behavior view (`/behavior`) ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    /// Force native Dolby Vision when the TV advertises it. 0 off, 1 on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_dovi_native: Option<u8>,
}

impl Behavior {
    pub fn dovi_native_forced(&self) -> Option<bool> {
        self.force_dovi_native.map(|v| v != 0)
    }
}
