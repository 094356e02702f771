// ── Core error types ──
//
// API failures pass through untouched so callers keep the four-kind
// taxonomy. The core adds schema failures for documents that do not match
// the typed views.

use syncbox_api::{ErrorKind, Resource};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] syncbox_api::Error),

    // ── Data errors ──────────────────────────────────────────────────
    /// A subsystem document did not match its view.
    #[error("Malformed {subsystem} document: {source}")]
    Schema {
        subsystem: Resource,
        #[source]
        source: serde_json::Error,
    },

    /// The root document is not a JSON object.
    #[error("Malformed state document: {message}")]
    InvalidDocument { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Collapse into the taxonomy callers react to. Anything the core adds
    /// is a request failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(e) => e.kind(),
            Self::Schema { .. } | Self::InvalidDocument { .. } | Self::Config { .. } => {
                ErrorKind::Request
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }
}
