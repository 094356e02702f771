//! Read-only views: status, per-subsystem detail and watch.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use syncbox_core::{
    Behavior, Device, Execution, Hdmi, Hue, Snapshot, Subsystem, SubsystemHandle, SyncBox,
    SyncBoxConfig,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output::{self, Detail, flag, heading};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last mode")]
    last_sync_mode: String,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lights")]
    num_lights: u32,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

// ── Detail renderers ────────────────────────────────────────────────

pub fn device_detail(d: &Device, color: bool) -> String {
    Detail::new(color)
        .row("Name", &d.name)
        .row("Type", &d.device_type)
        .row("Unique ID", &d.unique_id)
        .row("IP", &d.ip_address)
        .row("Firmware", &d.firmware_version)
        .row("API level", d.api_level)
        .opt_row(
            "Wi-Fi",
            d.wifi
                .as_ref()
                .map(|w| format!("{} ({}/4)", w.ssid, w.strength)),
        )
        .opt_row("LED mode", d.led_mode)
        .render()
}

pub fn execution_detail(e: &Execution, color: bool) -> String {
    Detail::new(color)
        .row("Mode", &e.mode)
        .row("Sync", flag(e.sync_active, color))
        .row("HDMI", flag(e.hdmi_active, color))
        .row("Source", &e.hdmi_source)
        .row("Brightness", e.brightness)
        .opt_row("Intensity", e.current_sync_mode().map(|m| &m.intensity))
        .opt_row("Last sync mode", e.last_sync_mode.as_ref())
        .opt_row("Hue target", e.hue_target.as_ref())
        .render()
}

pub fn hdmi_detail(h: &Hdmi, color: bool) -> String {
    let mut out = Detail::new(color)
        .row("Content", &h.content_specs)
        .row("Video sync", flag(h.video_sync_supported, color))
        .row("Audio sync", flag(h.audio_sync_supported, color))
        .render();

    let port_row = |port: String, p: &syncbox_core::HdmiPort| PortRow {
        port,
        name: p.name.clone(),
        kind: p.kind.clone(),
        status: p.status.clone(),
        last_sync_mode: p.last_sync_mode.clone().unwrap_or_default(),
    };
    let mut rows: Vec<PortRow> = h
        .inputs()
        .map(|(input, p)| port_row(input.to_string(), p))
        .collect();
    if let Some(ref p) = h.output {
        rows.push(port_row("output".into(), p));
    }
    if !rows.is_empty() {
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }
    out
}

pub fn hue_detail(h: &Hue, color: bool) -> String {
    let mut out = Detail::new(color)
        .row("Connection", &h.connection_state)
        .opt_row("Bridge ID", h.bridge_unique_id.as_ref())
        .opt_row("Bridge IP", h.bridge_ip_address.as_ref())
        .render();

    let rows: Vec<GroupRow> = h
        .groups
        .iter()
        .flatten()
        .map(|(id, g)| GroupRow {
            id: id.clone(),
            name: g.name.clone(),
            num_lights: g.num_lights,
            active: flag(g.active, color),
            owner: g.owner.clone().unwrap_or_default(),
        })
        .collect();
    if !rows.is_empty() {
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }
    out
}

pub fn behavior_detail(b: &Behavior, color: bool) -> String {
    Detail::new(color)
        .opt_row(
            "Force DoVi native",
            b.dovi_native_forced().map(|on| flag(on, color)),
        )
        .render()
}

// ── Handlers ────────────────────────────────────────────────────────

/// Refresh one subsystem and print it.
pub async fn show<T>(
    handle: SubsystemHandle<'_, T>,
    global: &GlobalOpts,
    render: fn(&T, bool) -> String,
) -> Result<(), CliError>
where
    T: Subsystem + Serialize,
{
    handle.refresh().await?;
    let view = util::require(handle.get(), &T::RESOURCE.to_string())?;
    let color = output::should_color(global.color);
    let out = output::render_single(global.output, view.as_ref(), |v| render(v, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn hdmi(sync_box: &SyncBox, global: &GlobalOpts) -> Result<(), CliError> {
    show(sync_box.hdmi(), global, hdmi_detail).await
}

#[derive(Serialize)]
struct StatusView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution: Option<&'a Execution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hue: Option<&'a Hue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hdmi: Option<&'a Hdmi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    behavior: Option<&'a Behavior>,
}

impl<'a> From<&'a Snapshot> for StatusView<'a> {
    fn from(s: &'a Snapshot) -> Self {
        Self {
            device: s.device().map(AsRef::as_ref),
            execution: s.execution().map(AsRef::as_ref),
            hue: s.hue().map(AsRef::as_ref),
            hdmi: s.hdmi().map(AsRef::as_ref),
            behavior: s.behavior().map(AsRef::as_ref),
        }
    }
}

fn status_detail(view: &StatusView<'_>, color: bool) -> String {
    let mut sections = Vec::new();
    if let Some(d) = view.device {
        sections.push(format!("{}\n{}", heading("Device", color), device_detail(d, color)));
    }
    if let Some(e) = view.execution {
        sections.push(format!(
            "{}\n{}",
            heading("Execution", color),
            execution_detail(e, color)
        ));
    }
    if let Some(h) = view.hdmi {
        sections.push(format!("{}\n{}", heading("HDMI", color), hdmi_detail(h, color)));
    }
    if let Some(h) = view.hue {
        sections.push(format!("{}\n{}", heading("Hue", color), hue_detail(h, color)));
    }
    if let Some(b) = view.behavior {
        sections.push(format!(
            "{}\n{}",
            heading("Behavior", color),
            behavior_detail(b, color)
        ));
    }
    sections.join("\n\n")
}

/// `syncbox status`: fetch the full document and print every view.
pub async fn status(sync_box: &SyncBox, global: &GlobalOpts) -> Result<(), CliError> {
    sync_box.initialize().await?;
    let snapshot = sync_box.snapshot();
    let view = StatusView::from(snapshot.as_ref());
    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &view, |v| status_detail(v, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One line summarizing what the box is doing.
fn summary_line(snapshot: &Snapshot, execution: &Execution, color: bool) -> String {
    let time = snapshot
        .fetched_at()
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let intensity = execution
        .current_sync_mode()
        .map(|m| format!(" intensity={}", m.intensity))
        .unwrap_or_default();
    format!(
        "{time} mode={} source={} brightness={} sync={}{intensity}",
        execution.mode,
        execution.hdmi_source,
        execution.brightness,
        flag(execution.sync_active, color),
    )
}

/// `syncbox watch`: print the execution state whenever it changes.
pub async fn watch(
    resolved: &SyncBoxConfig,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut config = resolved.clone();
    config.refresh_interval_secs = args.interval.max(1);
    let sync_box = SyncBox::new(&config)?;
    let mut rx = sync_box.subscribe();
    let color = output::should_color(global.color);

    let result = async {
        sync_box.initialize().await?;

        let mut last: Option<Arc<Execution>> = None;
        let mut printed = 0u64;
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if let Some(execution) = snapshot.execution() {
                if last.as_deref() != Some(execution.as_ref()) {
                    let line = match global.output {
                        OutputFormat::Table => summary_line(&snapshot, execution, color),
                        OutputFormat::Json | OutputFormat::JsonCompact => {
                            output::render_json(execution.as_ref(), true)?
                        }
                    };
                    output::print_output(&line, global.quiet);
                    last = Some(Arc::clone(execution));
                    printed += 1;
                }
            }
            if args.count.is_some_and(|n| printed >= n) {
                break;
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        Ok::<(), CliError>(())
    }
    .await;

    sync_box.close().await;
    result
}
