// ── Typed sub-resource views ──
//
// One immutable projection per subsystem of the state document. Views are
// rebuilt from the device on every refresh and never mutated in place.

pub mod behavior;
pub mod device;
pub mod execution;
pub mod hdmi;
pub mod hue;

pub use behavior::Behavior;
pub use device::{Device, Wifi};
pub use execution::{Execution, SyncMode};
pub use hdmi::{Hdmi, HdmiInput, HdmiPort};
pub use hue::{Group, Hue};
