//! Clap derive structures for the `syncbox` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// syncbox -- pair with and control an HDMI sync box on the local network
#[derive(Debug, Parser)]
#[command(
    name = "syncbox",
    version,
    about = "Control an HDMI sync box from the command line",
    long_about = "Pairs with an HDMI sync box over its local HTTPS API, shows its state\n\
        and changes sync mode, input, brightness and entertainment area.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Sync box profile to use
    #[arg(long, short = 'p', env = "SYNCBOX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// IP address or hostname of the box (overrides profile)
    #[arg(long, short = 'H', env = "SYNCBOX_HOST", global = true)]
    pub host: Option<String>,

    /// Device unique id expected in the certificate (overrides profile)
    #[arg(long, env = "SYNCBOX_ID", global = true)]
    pub id: Option<String>,

    /// HTTPS port (overrides profile)
    #[arg(long, env = "SYNCBOX_PORT", global = true)]
    pub port: Option<u16>,

    /// Access token (overrides profile)
    #[arg(long, env = "SYNCBOX_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// PEM root certificate to trust instead of the bundled one
    #[arg(long, env = "SYNCBOX_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SYNCBOX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SYNCBOX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable key/value listing (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pair with the box (press its button when asked)
    Register(RegisterArgs),

    /// Revoke a registration
    Unregister {
        /// Registration id (defaults to the one saved in the profile)
        registration_id: Option<String>,
    },

    /// Check whether the configured token is accepted
    Check,

    /// Show the full state of the box
    #[command(alias = "st")]
    Status,

    /// Print a line every time the state changes
    Watch(WatchArgs),

    /// Device identity and actions
    #[command(alias = "dev")]
    Device(DeviceArgs),

    /// Sync mode, input and brightness
    #[command(alias = "exec", alias = "x")]
    Execution(ExecutionArgs),

    /// HDMI inputs and output
    Hdmi,

    /// Hue bridge and entertainment areas
    Hue(HueArgs),

    /// Device behavior settings
    Behavior(BehaviorArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGISTRATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Application name shown in the vendor app
    #[arg(long, default_value = "syncbox")]
    pub app: String,

    /// Instance name, e.g. the machine this runs on
    #[arg(long, default_value = "cli")]
    pub instance: String,

    /// How long to wait for the button press
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub wait: Duration,

    /// Delay between pairing attempts
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub poll_interval: Duration,

    /// Save host, id, token and registration id to the active profile
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in seconds
    #[arg(long, short = 'i', default_value = "5")]
    pub interval: u64,

    /// Stop after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBSYSTEMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: Option<DeviceCommand>,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Show device identity (default)
    Show,

    /// Change the friendly name
    Rename { name: String },

    /// Restart the box
    Restart,
}

#[derive(Debug, Args)]
pub struct ExecutionArgs {
    #[command(subcommand)]
    pub command: Option<ExecutionCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ExecutionCommand {
    /// Show execution state (default)
    Show,

    /// Change several fields in one request
    Set(SetStateArgs),

    /// Flip sync or HDMI power
    Toggle { target: ToggleTarget },

    /// Step through modes, inputs or intensities
    Cycle {
        target: CycleTarget,

        /// Go backwards
        #[arg(long)]
        previous: bool,
    },

    /// Change brightness by a relative step (-200..=200)
    Brightness {
        #[arg(allow_hyphen_values = true)]
        step: i64,
    },
}

#[derive(Debug, Args)]
pub struct SetStateArgs {
    /// Start or stop syncing
    #[arg(long)]
    pub sync_active: Option<bool>,

    /// Power HDMI passthrough on or off
    #[arg(long)]
    pub hdmi_active: Option<bool>,

    /// powersave, passthrough, video, game or music
    #[arg(long)]
    pub mode: Option<String>,

    /// input1 .. input4
    #[arg(long)]
    pub source: Option<String>,

    /// 0..=200
    #[arg(long)]
    pub brightness: Option<i64>,

    /// subtle, moderate, high or intense
    #[arg(long)]
    pub intensity: Option<String>,

    /// Entertainment area, e.g. groups/13
    #[arg(long)]
    pub hue_target: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToggleTarget {
    Sync,
    Hdmi,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CycleTarget {
    Mode,
    Source,
    Intensity,
}

#[derive(Debug, Args)]
pub struct HueArgs {
    #[command(subcommand)]
    pub command: Option<HueCommand>,
}

#[derive(Debug, Subcommand)]
pub enum HueCommand {
    /// Show bridge and entertainment areas (default)
    Show,

    /// Start streaming to an entertainment area
    Activate { group: String },

    /// Stop streaming to an entertainment area
    Deactivate { group: String },
}

#[derive(Debug, Args)]
pub struct BehaviorArgs {
    #[command(subcommand)]
    pub command: Option<BehaviorCommand>,
}

#[derive(Debug, Subcommand)]
pub enum BehaviorCommand {
    /// Show behavior settings (default)
    Show,

    /// Force native Dolby Vision on or off
    Dovi { state: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the configuration with secrets masked
    Show,

    /// Print the config file path
    Path,

    /// List profile names
    Profiles,

    /// Set the default profile
    Use { name: String },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
