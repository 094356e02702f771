// Shared transport configuration for building the reqwest::Client.
//
// The box handles very few simultaneous connections, so the pool keeps at
// most one idle connection and the executor never has more than one request
// in flight.

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::error::Error;
use crate::tls::{BUNDLED_ROOT_CA, client_config};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which root certificate the transport trusts. The system store is never used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// The development root compiled into the crate. Real boxes chain to the
    /// vendor root, which has to be supplied with `CustomCa`.
    #[default]
    Bundled,
    /// A PEM file with the root certificate(s) to trust instead.
    CustomCa(PathBuf),
}

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Total time allowed for one request, body included.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Bundled,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    fn root_pem(&self) -> Result<Cow<'static, [u8]>, Error> {
        match &self.tls {
            TlsMode::Bundled => {
                warn!(
                    "trusting the bundled development root, which no real sync box chains to; \
                     set ca_cert to the vendor root certificate"
                );
                Ok(Cow::Borrowed(BUNDLED_ROOT_CA.as_bytes()))
            }
            TlsMode::CustomCa(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| Error::Tls(format!("failed to read CA cert {}: {e}", path.display()))),
        }
    }

    /// Build a `reqwest::Client` that validates the server against `identity`.
    pub fn build_client(&self, identity: &str) -> Result<reqwest::Client, Error> {
        let tls = client_config(&self.root_pem()?, identity)?;

        reqwest::Client::builder()
            .use_preconfigured_tls(tls)
            .https_only(true)
            .timeout(self.timeout)
            .pool_max_idle_per_host(1)
            .user_agent(concat!("syncbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
