// State resource endpoints
//
// The root document and the per-subsystem documents below it, plus the
// partial-update PUTs.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::SyncBoxClient;
use crate::error::Error;
use crate::models::{BehaviorUpdate, DeviceUpdate, ExecutionUpdate, GroupUpdate};

/// A subsystem document. Its key in the root document equals its path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Device,
    Execution,
    Hue,
    Hdmi,
    Behavior,
}

impl Resource {
    /// Key of this subsystem in the root document.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Root-relative path, e.g. `/execution`.
    pub fn path(self) -> String {
        format!("/{}", self.key())
    }
}

impl SyncBoxClient {
    /// Fetch the full state document.
    ///
    /// `GET /`
    pub async fn get_state(&self) -> Result<Option<Value>, Error> {
        debug!("fetching full state");
        self.get("").await
    }

    /// Fetch one subsystem document.
    pub async fn get_resource(&self, resource: Resource) -> Result<Option<Value>, Error> {
        debug!(%resource, "fetching subsystem state");
        self.get(&resource.path()).await
    }

    /// `PUT /execution`
    pub async fn update_execution(&self, update: &ExecutionUpdate) -> Result<(), Error> {
        self.put(&Resource::Execution.path(), update).await?;
        Ok(())
    }

    /// `PUT /device`
    pub async fn update_device(&self, update: &DeviceUpdate) -> Result<(), Error> {
        self.put(&Resource::Device.path(), update).await?;
        Ok(())
    }

    /// `PUT /behavior`
    pub async fn update_behavior(&self, update: &BehaviorUpdate) -> Result<(), Error> {
        self.put(&Resource::Behavior.path(), update).await?;
        Ok(())
    }

    /// Start or stop streaming to an entertainment area.
    ///
    /// `PUT /hue/groups/{id}`
    pub async fn set_group_active(&self, group_id: &str, active: bool) -> Result<(), Error> {
        let update = GroupUpdate {
            active: Some(active),
        };
        let body = serde_json::to_value(&update).map_err(Error::Encode)?;
        let url = self.item_url("/hue/groups", group_id)?;
        self.execute_url(Method::PUT, url, Some(&body), true).await?;
        Ok(())
    }
}
