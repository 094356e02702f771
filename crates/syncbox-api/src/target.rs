// Connection target
//
// What to dial and what identity to expect. The two are deliberately
// separate: the box is usually reached by IP address, but its certificate
// is issued for its unique id.

use std::net::Ipv6Addr;

use url::Url;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_PATH_PREFIX: &str = "/api";
pub const API_VERSION: &str = "v1";

/// Where a sync box lives and who it claims to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// IP literal or hostname used to open the socket.
    pub host: String,
    pub port: u16,
    /// API path prefix, `/api` on every known firmware.
    pub path_prefix: String,
    /// Device unique id, the certificate common name.
    pub identity: String,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            path_prefix: DEFAULT_PATH_PREFIX.into(),
            identity: identity.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// `https://{host}:{port}{prefix}/v1`, without a trailing slash.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let prefix = self.path_prefix.trim_end_matches('/');
        let url = Url::parse(&format!(
            "https://{host}:{port}{prefix}/{API_VERSION}",
            port = self.port
        ))?;
        Ok(url)
    }
}
