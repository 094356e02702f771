// ── Snapshot store ──
//
// Owns the single reference to the current snapshot. Every refresh builds a
// complete new snapshot off to the side and swaps it in through the watch
// channel, so readers see either the old generation or the new one.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use super::snapshot::{Snapshot, Subsystem};

pub struct StateStore {
    current: watch::Sender<Arc<Snapshot>>,
}

impl StateStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(Snapshot::default()));
        Self { current }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.borrow())
    }

    /// Receive every published generation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.current.subscribe()
    }

    /// Replace all views at once with those of `next`.
    pub(crate) fn apply_full(&self, next: Snapshot) -> u64 {
        self.publish(|_| next)
    }

    /// Replace one view. Siblings are carried over by reference.
    pub(crate) fn apply_view<T: Subsystem>(&self, view: Arc<T>) -> u64 {
        self.publish(|current| {
            let mut next = current.clone();
            *T::slot_mut(&mut next) = Some(view);
            next
        })
    }

    fn publish(&self, build: impl FnOnce(&Snapshot) -> Snapshot) -> u64 {
        let mut generation = 0;
        self.current.send_modify(|current| {
            let mut next = build(current);
            next.generation = current.generation + 1;
            next.fetched_at = Some(Utc::now());
            generation = next.generation;
            *current = Arc::new(next);
        });
        generation
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Behavior, Hue};

    fn root() -> serde_json::Value {
        json!({
            "hue": {"connectionState": "connected"},
            "behavior": {"forceDoviNative": 0},
        })
    }

    #[test]
    fn starts_empty() {
        let store = StateStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.fetched_at().is_none());
        assert!(snapshot.hue().is_none());
    }

    #[test]
    fn full_apply_bumps_generation() {
        let store = StateStore::new();
        assert_eq!(store.apply_full(Snapshot::from_root(&root()).unwrap()), 1);
        assert_eq!(store.apply_full(Snapshot::from_root(&root()).unwrap()), 2);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.generation(), 2);
        assert!(snapshot.fetched_at().is_some());
        assert_eq!(snapshot.hue().unwrap().connection_state, "connected");
    }

    #[test]
    fn view_apply_keeps_siblings() {
        let store = StateStore::new();
        store.apply_full(Snapshot::from_root(&root()).unwrap());
        let before = store.snapshot();

        store.apply_view(Arc::new(Behavior {
            force_dovi_native: Some(1),
        }));
        let after = store.snapshot();

        assert_eq!(after.generation(), before.generation() + 1);
        assert!(Arc::ptr_eq(after.hue().unwrap(), before.hue().unwrap()));
        assert_eq!(after.behavior().unwrap().force_dovi_native, Some(1));
        // The published snapshot is untouched.
        assert_eq!(before.behavior().unwrap().force_dovi_native, Some(0));
    }

    #[test]
    fn subscribers_see_new_generations() {
        let store = StateStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.apply_view(Arc::new(Hue {
            bridge_unique_id: None,
            bridge_ip_address: None,
            connection_state: "connecting".into(),
            groups: None,
        }));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().generation(), 1);
    }
}
