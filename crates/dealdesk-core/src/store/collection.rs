// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage keyed by entity id, with push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::EntityId;

/// A lock-free, reactive collection for a single entity type.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels for
/// push-based change notification. Every mutation bumps a version counter
/// and rebuilds the snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    by_id: DashMap<EntityId, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for cheap subscription reads.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self { by_id: DashMap::new(), version, snapshot }
    }

    /// Insert or update an entity. Returns `true` if the id was new.
    pub(crate) fn upsert(&self, id: EntityId, entity: T) -> bool {
        let is_new = self.by_id.insert(id, Arc::new(entity)).is_none();
        self.rebuild_snapshot();
        self.bump_version();
        is_new
    }

    /// Remove an entity. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = self.by_id.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    /// Replace the whole collection in one snapshot rebuild. Used for the
    /// initial load after connecting and for explicit refreshes.
    pub(crate) fn replace_all(&self, entries: Vec<(EntityId, T)>) {
        self.by_id.clear();
        for (id, entity) in entries {
            self.by_id.insert(id, Arc::new(entity));
        }
        self.rebuild_snapshot();
        self.bump_version();
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.by_id.clear();
        self.rebuild_snapshot();
        self.bump_version();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values into a snapshot vec and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<T>> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_id() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.upsert(EntityId::from("p1"), "basic".into()));
        assert!(!col.upsert(EntityId::from("p1"), "pro".into()));
        assert_eq!(*col.get(&EntityId::from("p1")).unwrap(), "pro");
    }

    #[test]
    fn remove_drops_the_entity_and_bumps_version() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert(EntityId::from("p1"), "basic".into());
        let v = col.version();

        let removed = col.remove(&EntityId::from("p1"));
        assert_eq!(*removed.unwrap(), "basic");
        assert!(col.is_empty());
        assert!(col.version() > v);

        // Removing again is a no-op and leaves the version alone.
        let v = col.version();
        assert!(col.remove(&EntityId::from("p1")).is_none());
        assert_eq!(col.version(), v);
    }

    #[test]
    fn replace_all_swaps_contents_in_one_step() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert(EntityId::from("old"), "x".into());

        col.replace_all(vec![
            (EntityId::from("a"), "1".into()),
            (EntityId::from("b"), "2".into()),
        ]);
        assert_eq!(col.len(), 2);
        assert!(col.get(&EntityId::from("old")).is_none());
    }

    #[tokio::test]
    async fn subscribers_see_mutations() {
        let col: EntityCollection<String> = EntityCollection::new();
        let mut rx = col.subscribe();
        assert!(rx.borrow().is_empty());

        col.upsert(EntityId::from("p1"), "basic".into());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
