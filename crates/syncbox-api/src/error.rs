use serde::Deserialize;
use thiserror::Error;

/// The four failure kinds a caller has to tell apart.
///
/// Callers re-run pairing on [`Unauthorized`](Self::Unauthorized), keep
/// polling on [`InvalidState`](Self::InvalidState) and treat everything else
/// as a connectivity problem to retry later or report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// Bad, missing or revoked access token.
    Unauthorized,
    /// Network, timeout, TLS, or a device code in the request range.
    Request,
    /// A physical or state precondition (e.g. the pairing button) is not met.
    InvalidState,
    /// Device code that the table does not know about.
    Device,
}

/// Map a device-reported error code onto an [`ErrorKind`].
///
/// The table is defined by the device firmware.
pub fn classify(code: i64) -> ErrorKind {
    match code {
        1..=3 => ErrorKind::Unauthorized,
        10..=15 => ErrorKind::Request,
        16 => ErrorKind::InvalidState,
        _ => ErrorKind::Device,
    }
}

/// Top-level error type for the `syncbox-api` crate.
///
/// Device-reported failures keep the numeric code and message and display as
/// `"<code>: <message>"`. Everything that goes wrong before a device answer is
/// available (connect, TLS, timeout) is a request failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Device-reported ─────────────────────────────────────────────
    /// Codes 1–3.
    #[error("{code}: {message}")]
    Unauthorized { code: i64, message: String },

    /// Codes 10–15.
    #[error("{code}: {message}")]
    Request { code: i64, message: String },

    /// Code 16, e.g. the link button has not been pressed yet.
    #[error("{code}: {message}")]
    InvalidState { code: i64, message: String },

    /// Any code not in the table.
    #[error("{code}: {message}")]
    Device { code: i64, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, certificate rejected, ...
    #[error("Error requesting data from {host}: {source}")]
    Transport {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status without a JSON error body.
    #[error("Unexpected HTTP {status} from {host}")]
    Http { host: String, status: u16 },

    /// Building the TLS configuration failed (bad root certificate, bad identity).
    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An id that cannot be used as a single path segment.
    #[error("Invalid resource id {0:?}")]
    InvalidId(String),

    // ── Data ────────────────────────────────────────────────────────
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// JSON decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build the error for a device-reported `{code, message}` pair.
    pub fn from_device(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match classify(code) {
            ErrorKind::Unauthorized => Self::Unauthorized { code, message },
            ErrorKind::Request => Self::Request { code, message },
            ErrorKind::InvalidState => Self::InvalidState { code, message },
            ErrorKind::Device => Self::Device { code, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Device { .. } => ErrorKind::Device,
            Self::Request { .. }
            | Self::Transport { .. }
            | Self::Http { .. }
            | Self::Tls(_)
            | Self::InvalidUrl(_)
            | Self::InvalidId(_)
            | Self::Encode(_)
            | Self::Deserialization { .. } => ErrorKind::Request,
        }
    }

    /// The device-reported code, if this error came from the device.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Unauthorized { code, .. }
            | Self::Request { code, .. }
            | Self::InvalidState { code, .. }
            | Self::Device { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if the token is missing, wrong or revoked and
    /// pairing again might resolve it.
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Returns `true` while the device waits for the pairing button.
    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }

    /// Returns `true` for timeouts and connect failures.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}

/// Error body the device sends with non-success JSON responses.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl From<DeviceErrorBody> for Error {
    fn from(body: DeviceErrorBody) -> Self {
        Self::from_device(body.code, body.message)
    }
}
