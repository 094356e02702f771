//! Command dispatch: bridges CLI args -> sync box calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod registration;
pub mod state;
pub mod util;

use syncbox_core::{SyncBox, SyncBoxConfig};

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a box-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: &SyncBoxConfig,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Watch owns a SyncBox with a running refresh task.
    if let Command::Watch(ref args) = cmd {
        return state::watch(resolved, args, global).await;
    }

    let sync_box = SyncBox::new(resolved)?;
    let result = match cmd {
        Command::Unregister { registration_id } => {
            registration::unregister(&sync_box, registration_id, cfg, global).await
        }
        Command::Check => registration::check(&sync_box, global).await,
        Command::Status => state::status(&sync_box, global).await,
        Command::Hdmi => state::hdmi(&sync_box, global).await,
        Command::Device(args) => control::device(&sync_box, args, global).await,
        Command::Execution(args) => control::execution(&sync_box, args, global).await,
        Command::Hue(args) => control::hue(&sync_box, args, global).await,
        Command::Behavior(args) => control::behavior(&sync_box, args, global).await,
        // Handled before dispatch
        Command::Register(_) | Command::Watch(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    };
    sync_box.close().await;
    result
}
