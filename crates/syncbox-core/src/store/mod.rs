// ── Snapshot store ──
//
// Copy-on-refresh state with an atomic swap and watch-based notification.

mod snapshot;
mod state_store;

pub use snapshot::{Snapshot, Subsystem};
pub use state_store::StateStore;
