//! Configuration for syncbox tools.
//!
//! TOML profiles merged with `SYNCBOX_*` environment variables, token
//! resolution, and translation to `syncbox_core::SyncBoxConfig`. The core
//! never reads files; the CLI loads a profile here and hands the result in.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use syncbox_api::{ConnectionTarget, TlsMode};
use syncbox_core::SyncBoxConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named sync box profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh period (seconds). 0 disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_timeout() -> u64 {
    syncbox_api::transport::DEFAULT_TIMEOUT.as_secs()
}
fn default_refresh_interval() -> u64 {
    syncbox_core::config::DEFAULT_REFRESH_INTERVAL_SECS
}

/// A named sync box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// IP address or hostname to dial.
    pub host: String,

    /// Device unique id, checked against the certificate.
    pub id: String,

    pub port: Option<u16>,

    /// API path prefix, `/api` when unset.
    pub path: Option<String>,

    /// Access token (plaintext; prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable holding the access token.
    pub token_env: Option<String>,

    /// Registration the token belongs to, needed to unregister.
    pub registration_id: Option<String>,

    /// PEM root certificate to trust instead of the bundled one.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override refresh interval.
    pub refresh_interval: Option<u64>,
}

impl Config {
    /// Look up `name`, or the default profile when `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned();
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile)),
            None => Err(ConfigError::UnknownProfile { profile: name }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "syncbox", "syncbox").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("syncbox");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) merged with `SYNCBOX_*` env vars.
///
/// Nested keys use a double underscore, e.g.
/// `SYNCBOX_PROFILES__LIVING__HOST=192.168.1.20`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = file_figment(path).merge(Env::prefixed("SYNCBOX_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the canonical file without environment overrides.
pub fn load_config_file() -> Result<Config, ConfigError> {
    load_config_file_from(&config_path())
}

/// Load `path` alone (missing file is fine). Edit-and-save paths start from
/// this so `SYNCBOX_*` overrides never end up in the file.
pub fn load_config_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Resolve the access token: `token_env` first, then the plaintext token.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    profile.token.clone().map(SecretString::from)
}

/// Build a `SyncBoxConfig` from a profile and the global defaults.
pub fn profile_to_syncbox_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<SyncBoxConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "id".into(),
            reason: "the device unique id is required for certificate validation".into(),
        });
    }

    let mut target = ConnectionTarget::new(profile.host.trim(), profile.id.trim());
    if let Some(port) = profile.port {
        target = target.with_port(port);
    }
    if let Some(ref path) = profile.path {
        target = target.with_path_prefix(path.clone());
    }

    let tls = profile
        .ca_cert
        .clone()
        .map_or(TlsMode::Bundled, TlsMode::CustomCa);

    Ok(SyncBoxConfig {
        target,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        access_token: resolve_token(profile),
        refresh_interval_secs: profile.refresh_interval.unwrap_or(defaults.refresh_interval),
    })
}
