// syncbox-api: Async Rust client for the HDMI sync box local REST API.

pub mod client;
pub mod error;
pub mod models;
pub mod registration;
pub mod resources;
pub mod target;
pub mod tls;
pub mod transport;

pub use client::SyncBoxClient;
pub use error::{Error, ErrorKind, classify};
pub use models::{
    BehaviorUpdate, Cycle, DeviceAction, DeviceUpdate, ExecutionUpdate, GroupUpdate,
    SyncModeUpdate,
};
pub use registration::Registration;
pub use resources::Resource;
pub use target::ConnectionTarget;
pub use transport::{TlsMode, TransportConfig};
