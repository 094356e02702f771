// ── Hue view (`/hue`) ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bridge connection of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hue {
    /// 16 hex characters. Absent until a bridge is paired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_ip_address: Option<String>,
    /// `uninitialized`, `disconnected`, `connecting`, `unauthorized`,
    /// `connected`, `invalidgroup` or `streaming`.
    pub connection_state: String,
    /// Entertainment areas by id. `None` until the bridge groups have been
    /// retrieved, empty when the bridge has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Group>>,
}

/// An entertainment area on the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub num_lights: u32,
    /// Streaming, from this box or from something else.
    pub active: bool,
    /// Application that is streaming. Only reported while active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Hue {
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.as_ref()?.get(id)
    }
}
