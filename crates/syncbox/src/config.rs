//! CLI configuration: thin wrapper around `syncbox_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--host,
//! --id, --token, ...).

use std::time::Duration;

use secrecy::SecretString;

use syncbox_core::SyncBoxConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use syncbox_config::{
    Config, Profile, config_path, load_config, load_config_file, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge flag overrides into `profile` (or an empty profile).
pub fn merged_profile(global: &GlobalOpts, profile: Option<&Profile>) -> Profile {
    let mut merged = profile.cloned().unwrap_or_default();
    if let Some(ref host) = global.host {
        merged.host.clone_from(host);
    }
    if let Some(ref id) = global.id {
        merged.id.clone_from(id);
    }
    if global.port.is_some() {
        merged.port = global.port;
    }
    if global.ca_cert.is_some() {
        merged.ca_cert.clone_from(&global.ca_cert);
    }
    if global.timeout.is_some() {
        merged.timeout = global.timeout;
    }
    merged
}

/// Build a `SyncBoxConfig` from the config file, profile, and CLI overrides.
///
/// Commands run once, so the background refresh is always disabled.
pub fn resolve_syncbox_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<SyncBoxConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() {
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        if global.host.is_none() {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    }

    let merged = merged_profile(global, profile);
    let mut resolved = syncbox_config::profile_to_syncbox_config(&merged, &cfg.defaults)?;

    // Flag token beats profile token.
    if let Some(ref token) = global.token {
        resolved.access_token = Some(SecretString::from(token.clone()));
    }
    resolved.refresh_interval_secs = 0;

    Ok(resolved)
}

/// Connection settings for pairing, which needs no token.
pub fn resolve_for_registration(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(String, SyncBoxConfig), CliError> {
    let profile_name = active_profile_name(global, cfg);
    let mut resolved = resolve_syncbox_config(global, cfg)?;
    resolved.access_token = None;
    Ok((profile_name, resolved))
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

pub fn describe_timeout(timeout: Duration) -> String {
    humantime::format_duration(timeout).to_string()
}
