//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use syncbox_config::ConfigError;
use syncbox_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const NOT_READY: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the sync box at {host}")]
    #[diagnostic(
        code(syncbox::connection_failed),
        help(
            "Check that the box is powered and on the same network.\n\
             If the certificate was rejected, check the device id (--id) and ca_cert."
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(syncbox::timeout),
        help("Increase the timeout with --timeout or check the network.")
    )]
    Timeout {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authorization ────────────────────────────────────────────────
    #[error("The sync box rejected the access token ({message})")]
    #[diagnostic(
        code(syncbox::auth_failed),
        help("Pair again with: syncbox register --save")
    )]
    AuthFailed { message: String },

    #[error("The sync box is not ready ({message})")]
    #[diagnostic(
        code(syncbox::not_ready),
        help("Hold the button on the box until the LED blinks green, then retry.")
    )]
    NotReady { message: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device error {code}: {message}")]
    #[diagnostic(code(syncbox::device_error))]
    DeviceError { code: i64, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(syncbox::unexpected_response),
        help("The firmware may be newer than this tool. Run with -vv for details.")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(syncbox::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(syncbox::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: syncbox register --host <ip> --id <device id> --save"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No sync box configured")]
    #[diagnostic(
        code(syncbox::no_config),
        help(
            "Pass --host and --id, or create a profile with: syncbox register --save\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(syncbox::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(syncbox::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotReady { .. } => exit_code::NOT_READY,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(ConfigError::Validation { .. } | ConfigError::UnknownProfile { .. }) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),
            CoreError::Schema { .. } | CoreError::InvalidDocument { .. } => {
                CliError::UnexpectedResponse {
                    message: err.to_string(),
                }
            }
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<syncbox_api::Error> for CliError {
    fn from(err: syncbox_api::Error) -> Self {
        use syncbox_api::Error;

        match err {
            Error::Unauthorized { code, message } => CliError::AuthFailed {
                message: format!("{code}: {message}"),
            },
            Error::InvalidState { code, message } => CliError::NotReady {
                message: format!("{code}: {message}"),
            },
            Error::Request { code, message } | Error::Device { code, message } => {
                CliError::DeviceError { code, message }
            }
            Error::Transport { host, source } => {
                if source.is_timeout() {
                    CliError::Timeout {
                        source: Box::new(source),
                    }
                } else {
                    CliError::ConnectionFailed {
                        host,
                        source: Box::new(source),
                    }
                }
            }
            Error::Http { ref host, .. } => CliError::ConnectionFailed {
                host: host.clone(),
                source: err.to_string().into(),
            },
            Error::Tls(message) => CliError::ConnectionFailed {
                host: "(tls setup)".into(),
                source: message.into(),
            },
            Error::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            Error::InvalidId(id) => CliError::Validation {
                field: "id".into(),
                reason: format!("{id:?} is not a valid resource id"),
            },
            Error::Encode(e) => CliError::Json(e),
            Error::Deserialization { message, .. } => CliError::UnexpectedResponse { message },
        }
    }
}
