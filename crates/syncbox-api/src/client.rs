// Request executor
//
// Wraps `reqwest::Client` with sync box URL construction, bearer-token
// attachment and error-body decoding. Endpoint groups (registration,
// resources) are implemented as inherent methods in separate files.

use std::sync::{PoisonError, RwLock};

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::error::{DeviceErrorBody, Error};
use crate::target::ConnectionTarget;
use crate::transport::TransportConfig;

/// Raw HTTP client for the sync box API.
///
/// Owns the single pooled connection and the access token. The transport
/// lock is held for the whole request, so at most one request is in flight
/// and [`close`](Self::close) waits for it to finish. Once closed, every
/// request returns `Ok(None)` instead of failing.
pub struct SyncBoxClient {
    http: Mutex<Option<reqwest::Client>>,
    base_url: Url,
    access_token: RwLock<Option<SecretString>>,
}

impl SyncBoxClient {
    /// Create a client for `target`, trusting the configured root certificate
    /// and validating the server against `target.identity`.
    pub fn new(
        target: &ConnectionTarget,
        transport: &TransportConfig,
        access_token: Option<SecretString>,
    ) -> Result<Self, Error> {
        let base_url = target.base_url()?;
        let http = transport.build_client(&target.identity)?;
        Ok(Self::with_client(http, base_url, access_token))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` must already include the prefix and version segment
    /// (e.g. `https://192.168.1.20/api/v1`).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        access_token: Option<SecretString>,
    ) -> Self {
        Self {
            http: Mutex::new(Some(http)),
            base_url,
            access_token: RwLock::new(access_token),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn host(&self) -> String {
        self.base_url.host_str().unwrap_or("<unknown>").to_owned()
    }

    // ── Credential ───────────────────────────────────────────────────

    pub fn access_token(&self) -> Option<SecretString> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_access_token(&self, token: Option<SecretString>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Drop the pooled connection. Requests issued afterwards are no-ops.
    pub async fn close(&self) {
        if self.http.lock().await.take().is_some() {
            debug!(url = %self.base_url, "transport closed");
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.http.lock().await.is_none()
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `{base}{path}`, where `path` is root-relative (`""`, `"/execution"`, ...).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// `{base}{collection}/{id}`, with `id` percent-encoded as one segment.
    pub(crate) fn item_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        if matches!(id, "" | "." | "..") {
            return Err(Error::InvalidId(id.to_owned()));
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidId(id.to_owned()))?
            .push(id);
        Ok(url)
    }

    /// Issue one request and decode the JSON response.
    ///
    /// Returns `Ok(None)` when the transport is closed or the response has no
    /// JSON body. Non-success JSON responses are decoded as device errors.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<Option<Value>, Error> {
        let url = self.url(path)?;
        self.execute_url(method, url, body, requires_auth).await
    }

    /// [`execute`](Self::execute) against an already built URL.
    pub(crate) async fn execute_url(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<Option<Value>, Error> {
        let guard = self.http.lock().await;
        let Some(http) = guard.as_ref() else {
            debug!(%method, %url, "transport closed, skipping request");
            return Ok(None);
        };

        debug!(%method, %url, auth = requires_auth, "sending request");

        let mut builder = http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if requires_auth {
            if let Some(token) = self.access_token() {
                builder = builder.bearer_auth(token.expose_secret());
            }
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);
        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        drop(guard);

        if !is_json || bytes.is_empty() {
            if status.is_success() {
                return Ok(None);
            }
            return Err(Error::Http {
                host: self.host(),
                status: status.as_u16(),
            });
        }

        let data: Value = serde_json::from_slice(&bytes).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })?;
        trace!(%status, "response decoded");

        if !status.is_success() {
            let error: DeviceErrorBody =
                serde_json::from_value(data).map_err(|e| Error::Deserialization {
                    message: format!("HTTP {status} with unrecognised error body: {e}"),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                })?;
            return Err(error.into());
        }

        Ok(Some(data))
    }

    /// Authorized GET.
    pub async fn get(&self, path: &str) -> Result<Option<Value>, Error> {
        self.execute(Method::GET, path, None, true).await
    }

    /// Authorized GET, decoded into `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        self.get(path).await?.as_ref().map(decode).transpose()
    }

    /// Authorized PUT of a partial-update payload.
    pub async fn put(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<Value>, Error> {
        let body = serde_json::to_value(body).map_err(Error::Encode)?;
        self.execute(Method::PUT, path, Some(&body), true).await
    }

    /// Authorized DELETE.
    pub async fn delete(&self, path: &str) -> Result<Option<Value>, Error> {
        self.execute(Method::DELETE, path, None, true).await
    }

    fn transport_error(&self, source: reqwest::Error) -> Error {
        Error::Transport {
            host: self.host(),
            source,
        }
    }
}

/// `application/json`, ignoring case and any parameters.
fn is_json_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}
