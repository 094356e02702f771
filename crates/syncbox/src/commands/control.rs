//! Subsystem command handlers. Every change is followed by a scoped
//! refresh so the printed view reflects the box.

use syncbox_api::{Cycle, ExecutionUpdate};
use syncbox_core::SyncBox;

use crate::cli::{
    BehaviorArgs, BehaviorCommand, CycleTarget, DeviceArgs, DeviceCommand, ExecutionArgs,
    ExecutionCommand, GlobalOpts, HueArgs, HueCommand, SetStateArgs, Switch, ToggleTarget,
};
use crate::error::CliError;

use super::state::{self, behavior_detail, device_detail, execution_detail, hue_detail};
use super::util;

// ── Device ──────────────────────────────────────────────────────────

pub async fn device(sync_box: &SyncBox, args: DeviceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let handle = sync_box.device();
    match args.command.unwrap_or(DeviceCommand::Show) {
        DeviceCommand::Show => {}
        DeviceCommand::Rename { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "must not be empty".into(),
                });
            }
            handle.set_name(name).await?;
        }
        DeviceCommand::Restart => {
            handle.restart().await?;
            crate::output::print_output("Restarting", global.quiet);
            return Ok(());
        }
    }
    state::show(handle, global, device_detail).await
}

// ── Execution ───────────────────────────────────────────────────────

fn build_update(args: SetStateArgs) -> Result<ExecutionUpdate, CliError> {
    if let Some(ref mode) = args.mode {
        util::one_of("mode", mode, util::MODES)?;
    }
    if let Some(ref source) = args.source {
        util::one_of("source", source, util::SOURCES)?;
    }
    if let Some(ref intensity) = args.intensity {
        util::one_of("intensity", intensity, util::INTENSITIES)?;
    }
    if let Some(brightness) = args.brightness {
        util::in_range("brightness", brightness, 0, 200)?;
    }

    let update = ExecutionUpdate {
        sync_active: args.sync_active,
        hdmi_active: args.hdmi_active,
        mode: args.mode,
        hdmi_source: args.source,
        brightness: args.brightness,
        intensity: args.intensity,
        hue_target: args.hue_target,
        ..ExecutionUpdate::default()
    };
    if update == ExecutionUpdate::default() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: "nothing to change; pass at least one option".into(),
        });
    }
    Ok(update)
}

pub async fn execution(
    sync_box: &SyncBox,
    args: ExecutionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let handle = sync_box.execution();
    match args.command.unwrap_or(ExecutionCommand::Show) {
        ExecutionCommand::Show => {}
        ExecutionCommand::Set(set) => handle.set_state(&build_update(set)?).await?,
        ExecutionCommand::Toggle { target } => match target {
            ToggleTarget::Sync => handle.toggle_sync_active().await?,
            ToggleTarget::Hdmi => handle.toggle_hdmi_active().await?,
        },
        ExecutionCommand::Cycle { target, previous } => {
            let direction = if previous { Cycle::Previous } else { Cycle::Next };
            match target {
                CycleTarget::Mode => handle.cycle_sync_mode(direction).await?,
                CycleTarget::Source => handle.cycle_hdmi_source(direction).await?,
                CycleTarget::Intensity => handle.cycle_intensity(direction).await?,
            }
        }
        ExecutionCommand::Brightness { step } => {
            util::in_range("step", step, -200, 200)?;
            handle.increment_brightness(step).await?;
        }
    }
    state::show(handle, global, execution_detail).await
}

// ── Hue ─────────────────────────────────────────────────────────────

pub async fn hue(sync_box: &SyncBox, args: HueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let handle = sync_box.hue();
    match args.command.unwrap_or(HueCommand::Show) {
        HueCommand::Show => {}
        HueCommand::Activate { group } => handle.set_group_active(&group, true).await?,
        HueCommand::Deactivate { group } => handle.set_group_active(&group, false).await?,
    }
    state::show(handle, global, hue_detail).await
}

// ── Behavior ────────────────────────────────────────────────────────

pub async fn behavior(
    sync_box: &SyncBox,
    args: BehaviorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let handle = sync_box.behavior();
    match args.command.unwrap_or(BehaviorCommand::Show) {
        BehaviorCommand::Show => {}
        BehaviorCommand::Dovi { state: switch } => {
            handle.set_force_dovi_native(switch == Switch::On).await?;
        }
    }
    state::show(handle, global, behavior_detail).await
}
