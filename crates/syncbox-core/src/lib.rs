// syncbox-core: Snapshot synchronizer and typed views between syncbox-api and consumers.

pub mod config;
pub mod error;
pub mod handle;
pub mod model;
pub mod store;
pub mod syncbox;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SyncBoxConfig;
pub use error::CoreError;
pub use handle::SubsystemHandle;
pub use store::{Snapshot, StateStore, Subsystem};
pub use syncbox::{MIN_API_LEVEL, SyncBox};

pub use model::{
    Behavior, Device, Execution, Group, Hdmi, HdmiInput, HdmiPort, Hue, SyncMode, Wifi,
};
