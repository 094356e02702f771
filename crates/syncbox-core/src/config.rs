// ── Runtime connection configuration ──
//
// Describes how to reach one sync box. Carries the credential and transport
// tuning but never touches disk: the CLI builds a `SyncBoxConfig` and hands
// it in.

use std::time::Duration;

use secrecy::SecretString;
use syncbox_api::transport::DEFAULT_TIMEOUT;
use syncbox_api::{ConnectionTarget, TlsMode, TransportConfig};

/// Default period of the background refresh task (seconds).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Configuration for connecting to a single sync box.
#[derive(Debug, Clone)]
pub struct SyncBoxConfig {
    /// Dial address and certificate identity.
    pub target: ConnectionTarget,
    /// Root certificate to trust.
    pub tls: TlsMode,
    /// Total per-request timeout.
    pub timeout: Duration,
    /// Bearer token from an earlier pairing, if any.
    pub access_token: Option<SecretString>,
    /// How often the background task refreshes the snapshot. 0 = never.
    pub refresh_interval_secs: u64,
}

impl SyncBoxConfig {
    pub fn new(target: ConnectionTarget) -> Self {
        Self {
            target,
            tls: TlsMode::default(),
            timeout: DEFAULT_TIMEOUT,
            access_token: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
