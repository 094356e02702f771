// ── Subsystem handles ──
//
// A handle reads one view from the current snapshot, refreshes just that
// view, and carries the commands of its subsystem. Commands go straight to
// the device; call `refresh()` afterwards to see their effect.

use std::marker::PhantomData;
use std::sync::Arc;

use syncbox_api::{BehaviorUpdate, Cycle, DeviceAction, DeviceUpdate, ExecutionUpdate};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Behavior, Device, Execution, Hue};
use crate::store::Subsystem;
use crate::syncbox::SyncBox;

/// Access to one subsystem of a [`SyncBox`].
pub struct SubsystemHandle<'a, T> {
    sync_box: &'a SyncBox,
    _view: PhantomData<fn() -> T>,
}

impl<'a, T: Subsystem> SubsystemHandle<'a, T> {
    pub(crate) fn new(sync_box: &'a SyncBox) -> Self {
        Self {
            sync_box,
            _view: PhantomData,
        }
    }

    /// The view in the current snapshot, `None` until reported.
    pub fn get(&self) -> Option<Arc<T>> {
        self.sync_box.snapshot().view::<T>().cloned()
    }

    /// Re-fetch this subsystem only. The other views keep their identity.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let Some(document) = self.sync_box.client().get_resource(T::RESOURCE).await? else {
            return Ok(());
        };

        let view = T::from_document(&document)?;
        let generation = self.sync_box.store().apply_view(Arc::new(view));
        debug!(subsystem = %T::RESOURCE, generation, "subsystem refreshed");
        Ok(())
    }
}

// ── Execution ────────────────────────────────────────────────────

impl SubsystemHandle<'_, Execution> {
    /// Change any combination of execution fields in one request.
    pub async fn set_state(&self, update: &ExecutionUpdate) -> Result<(), CoreError> {
        Ok(self.sync_box.client().update_execution(update).await?)
    }

    pub async fn toggle_sync_active(&self) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            toggle_sync_active: true,
            ..ExecutionUpdate::default()
        })
        .await
    }

    pub async fn toggle_hdmi_active(&self) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            toggle_hdmi_active: true,
            ..ExecutionUpdate::default()
        })
        .await
    }

    pub async fn cycle_sync_mode(&self, direction: Cycle) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            cycle_sync_mode: Some(direction),
            ..ExecutionUpdate::default()
        })
        .await
    }

    pub async fn cycle_hdmi_source(&self, direction: Cycle) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            cycle_hdmi_source: Some(direction),
            ..ExecutionUpdate::default()
        })
        .await
    }

    /// `step` should be within -200..=200.
    pub async fn increment_brightness(&self, step: i64) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            increment_brightness: Some(step),
            ..ExecutionUpdate::default()
        })
        .await
    }

    /// Cycle the intensity of the current mode. Only has an effect while syncing.
    pub async fn cycle_intensity(&self, direction: Cycle) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            cycle_intensity: Some(direction),
            ..ExecutionUpdate::default()
        })
        .await
    }

    pub async fn set_intensity(&self, intensity: &str) -> Result<(), CoreError> {
        self.set_state(&ExecutionUpdate {
            intensity: Some(intensity.to_owned()),
            ..ExecutionUpdate::default()
        })
        .await
    }
}

// ── Device ───────────────────────────────────────────────────────

impl SubsystemHandle<'_, Device> {
    pub async fn update(&self, update: &DeviceUpdate) -> Result<(), CoreError> {
        Ok(self.sync_box.client().update_device(update).await?)
    }

    pub async fn set_name(&self, name: &str) -> Result<(), CoreError> {
        self.update(&DeviceUpdate {
            name: Some(name.to_owned()),
            ..DeviceUpdate::default()
        })
        .await
    }

    pub async fn restart(&self) -> Result<(), CoreError> {
        self.update(&DeviceUpdate {
            action: Some(DeviceAction::DoSoftwareRestart),
            ..DeviceUpdate::default()
        })
        .await
    }
}

// ── Hue ──────────────────────────────────────────────────────────

impl SubsystemHandle<'_, Hue> {
    /// Start or stop streaming to an entertainment area.
    pub async fn set_group_active(&self, group_id: &str, active: bool) -> Result<(), CoreError> {
        Ok(self
            .sync_box
            .client()
            .set_group_active(group_id, active)
            .await?)
    }
}

// ── Behavior ─────────────────────────────────────────────────────

impl SubsystemHandle<'_, Behavior> {
    pub async fn set_force_dovi_native(&self, enabled: bool) -> Result<(), CoreError> {
        let update = BehaviorUpdate {
            force_dovi_native: Some(u8::from(enabled)),
        };
        Ok(self.sync_box.client().update_behavior(&update).await?)
    }
}
