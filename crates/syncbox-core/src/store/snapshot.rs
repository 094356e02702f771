// ── State snapshot ──
//
// One generation of the device state: every view built from the same root
// document (or carried over unchanged by a scoped refresh).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use syncbox_api::Resource;

use crate::error::CoreError;
use crate::model::{Behavior, Device, Execution, Hdmi, Hue};

/// The last state fetched from the box.
///
/// Views are `None` until the device has reported them. A snapshot is never
/// modified after it has been published; refreshes publish a new one.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub(crate) generation: u64,
    pub(crate) fetched_at: Option<DateTime<Utc>>,
    pub(crate) device: Option<Arc<Device>>,
    pub(crate) execution: Option<Arc<Execution>>,
    pub(crate) hue: Option<Arc<Hue>>,
    pub(crate) hdmi: Option<Arc<Hdmi>>,
    pub(crate) behavior: Option<Arc<Behavior>>,
}

impl Snapshot {
    /// Build every view from a root document.
    ///
    /// Fails as a whole if any present sub-document is malformed.
    pub(crate) fn from_root(root: &Value) -> Result<Self, CoreError> {
        if !root.is_object() {
            return Err(CoreError::InvalidDocument {
                message: format!("expected an object, got {}", json_type(root)),
            });
        }

        Ok(Self {
            device: view_from_root(root)?,
            execution: view_from_root(root)?,
            hue: view_from_root(root)?,
            hdmi: view_from_root(root)?,
            behavior: view_from_root(root)?,
            ..Self::default()
        })
    }

    /// 0 before the first refresh, incremented on every publish.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// How long ago this snapshot was fetched.
    pub fn age(&self) -> Option<chrono::Duration> {
        self.fetched_at.map(|t| Utc::now() - t)
    }

    pub fn device(&self) -> Option<&Arc<Device>> {
        self.device.as_ref()
    }

    pub fn execution(&self) -> Option<&Arc<Execution>> {
        self.execution.as_ref()
    }

    pub fn hue(&self) -> Option<&Arc<Hue>> {
        self.hue.as_ref()
    }

    pub fn hdmi(&self) -> Option<&Arc<Hdmi>> {
        self.hdmi.as_ref()
    }

    pub fn behavior(&self) -> Option<&Arc<Behavior>> {
        self.behavior.as_ref()
    }

    /// Typed access to one view.
    pub fn view<T: Subsystem>(&self) -> Option<&Arc<T>> {
        T::slot(self)
    }
}

// ── Subsystem binding ───────────────────────────────────────────────

/// Binds a view type to its endpoint and its slot in the snapshot.
pub trait Subsystem: DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: Resource;

    fn slot(snapshot: &Snapshot) -> Option<&Arc<Self>>;

    fn slot_mut(snapshot: &mut Snapshot) -> &mut Option<Arc<Self>>;

    /// Build the view from its own sub-document.
    fn from_document(document: &Value) -> Result<Self, CoreError> {
        <Self as serde::Deserialize>::deserialize(document).map_err(|source| CoreError::Schema {
            subsystem: Self::RESOURCE,
            source,
        })
    }
}

macro_rules! subsystem {
    ($view:ty, $resource:ident, $field:ident) => {
        impl Subsystem for $view {
            const RESOURCE: Resource = Resource::$resource;

            fn slot(snapshot: &Snapshot) -> Option<&Arc<Self>> {
                snapshot.$field.as_ref()
            }

            fn slot_mut(snapshot: &mut Snapshot) -> &mut Option<Arc<Self>> {
                &mut snapshot.$field
            }
        }
    };
}

subsystem!(Device, Device, device);
subsystem!(Execution, Execution, execution);
subsystem!(Hue, Hue, hue);
subsystem!(Hdmi, Hdmi, hdmi);
subsystem!(Behavior, Behavior, behavior);

/// An absent key means "not yet populated", not an error.
fn view_from_root<T: Subsystem>(root: &Value) -> Result<Option<Arc<T>>, CoreError> {
    root.get(T::RESOURCE.key())
        .map(|document| T::from_document(document).map(Arc::new))
        .transpose()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_subsystems_are_not_yet_populated() {
        let snapshot = Snapshot::from_root(&json!({"behavior": {"forceDoviNative": 0}})).unwrap();
        assert!(snapshot.device().is_none());
        assert!(snapshot.hdmi().is_none());
        assert_eq!(
            snapshot.behavior().unwrap().dovi_native_forced(),
            Some(false)
        );
        assert_eq!(snapshot.generation(), 0);
    }

    #[test]
    fn one_malformed_view_fails_the_whole_build() {
        let err = Snapshot::from_root(&json!({
            "behavior": {"forceDoviNative": 1},
            "execution": {"mode": 5},
        }))
        .unwrap_err();
        assert!(
            matches!(
                err,
                CoreError::Schema {
                    subsystem: Resource::Execution,
                    ..
                }
            ),
            "got: {err:?}"
        );
    }

    #[test]
    fn root_must_be_an_object() {
        let err = Snapshot::from_root(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"), "{err}");
    }

    #[test]
    fn typed_access_matches_named_accessor() {
        let snapshot = Snapshot::from_root(&json!({"behavior": {}})).unwrap();
        assert!(Arc::ptr_eq(
            snapshot.view::<Behavior>().unwrap(),
            snapshot.behavior().unwrap()
        ));
    }
}
