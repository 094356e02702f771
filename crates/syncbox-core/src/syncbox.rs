// ── SyncBox abstraction ──
//
// Lifecycle of one sync box connection: pairing passthroughs, snapshot
// refresh, the optional background refresh task and typed subsystem
// handles.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use syncbox_api::{Registration, SyncBoxClient};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SyncBoxConfig;
use crate::error::CoreError;
use crate::handle::SubsystemHandle;
use crate::model::{Behavior, Device, Execution, Hdmi, Hue};
use crate::store::{Snapshot, StateStore};

/// Oldest device API level this crate is written against.
pub const MIN_API_LEVEL: u32 = 4;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SyncBoxInner>`. All clones share the client,
/// the snapshot and the background task.
#[derive(Clone)]
pub struct SyncBox {
    inner: Arc<SyncBoxInner>,
}

struct SyncBoxInner {
    client: SyncBoxClient,
    store: StateStore,
    refresh_interval_secs: u64,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncBox {
    /// Build the transport for `config`. Does not contact the box.
    pub fn new(config: &SyncBoxConfig) -> Result<Self, CoreError> {
        let client = SyncBoxClient::new(
            &config.target,
            &config.transport(),
            config.access_token.clone(),
        )?;
        Ok(Self::from_client(client, config.refresh_interval_secs))
    }

    /// Wrap an existing client. `refresh_interval_secs` of 0 disables the
    /// background task.
    pub fn from_client(client: SyncBoxClient, refresh_interval_secs: u64) -> Self {
        Self {
            inner: Arc::new(SyncBoxInner {
                client,
                store: StateStore::new(),
                refresh_interval_secs,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The underlying request executor.
    pub fn client(&self) -> &SyncBoxClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Fetch the first snapshot, check the API level and start the
    /// background refresh task.
    ///
    /// An API level below [`MIN_API_LEVEL`] is logged as an error; the
    /// client keeps working on a best-effort basis.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        self.refresh().await?;

        match self.snapshot().device() {
            Some(device) if device.api_level < MIN_API_LEVEL => {
                error!(
                    api_level = device.api_level,
                    required = MIN_API_LEVEL,
                    "sync box firmware is too old, please update it"
                );
            }
            Some(_) => {}
            None => debug!("root document has no device view, skipping the API level check"),
        }

        let interval_secs = self.inner.refresh_interval_secs;
        if interval_secs > 0 && !self.inner.cancel.is_cancelled() {
            let mut handles = self.inner.task_handles.lock().await;
            if handles.is_empty() {
                let sync_box = self.clone();
                let cancel = self.inner.cancel.clone();
                handles.push(tokio::spawn(refresh_task(sync_box, interval_secs, cancel)));
                debug!(interval_secs, "background refresh started");
            }
        }

        Ok(())
    }

    /// Stop the background task and close the transport.
    ///
    /// A refresh racing with this call finds the transport closed and
    /// leaves the snapshot alone.
    pub async fn close(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        self.inner.client.close().await;
        debug!("sync box closed");
    }

    /// Fetch the root document and swap in a new snapshot.
    ///
    /// A malformed sub-document fails the whole refresh and keeps the
    /// previous generation. A closed transport leaves the snapshot as is.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let Some(root) = self.inner.client.get_state().await? else {
            debug!("no state returned, keeping snapshot");
            return Ok(());
        };

        let snapshot = Snapshot::from_root(&root)?;
        let generation = self.inner.store.apply_full(snapshot);
        info!(generation, "state refreshed");
        Ok(())
    }

    // ── State observation ────────────────────────────────────────

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    /// Subscribe to snapshot generations.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.store.subscribe()
    }

    pub(crate) fn store(&self) -> &StateStore {
        &self.inner.store
    }

    // ── Subsystems ───────────────────────────────────────────────

    pub fn device(&self) -> SubsystemHandle<'_, Device> {
        SubsystemHandle::new(self)
    }

    pub fn execution(&self) -> SubsystemHandle<'_, Execution> {
        SubsystemHandle::new(self)
    }

    pub fn hue(&self) -> SubsystemHandle<'_, Hue> {
        SubsystemHandle::new(self)
    }

    pub fn hdmi(&self) -> SubsystemHandle<'_, Hdmi> {
        SubsystemHandle::new(self)
    }

    pub fn behavior(&self) -> SubsystemHandle<'_, Behavior> {
        SubsystemHandle::new(self)
    }

    // ── Registration ─────────────────────────────────────────────

    pub async fn is_registered(&self) -> Result<bool, CoreError> {
        Ok(self.inner.client.is_registered().await?)
    }

    /// Pair and start using the new token.
    pub async fn register(
        &self,
        application_name: &str,
        instance_name: &str,
    ) -> Result<Option<Registration>, CoreError> {
        Ok(self
            .inner
            .client
            .register(application_name, instance_name, true)
            .await?)
    }

    /// Poll until the pairing button is pressed or `timeout` elapses.
    pub async fn wait_for_registration(
        &self,
        application_name: &str,
        instance_name: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Option<Registration>, CoreError> {
        Ok(self
            .inner
            .client
            .wait_for_registration(application_name, instance_name, poll_interval, timeout)
            .await?)
    }

    pub async fn unregister(&self, registration_id: &str) -> Result<(), CoreError> {
        Ok(self.inner.client.unregister(registration_id).await?)
    }

    pub fn access_token(&self) -> Option<SecretString> {
        self.inner.client.access_token()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the snapshot until cancelled.
async fn refresh_task(sync_box: SyncBox, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = sync_box.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
