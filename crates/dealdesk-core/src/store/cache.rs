// ── Read-mostly reference cache ──

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;

/// Process-wide cache for a small reference collection that is populated
/// once at connect time and read everywhere after.
///
/// The contract is explicit: [`initialize`](Self::initialize) replaces the
/// contents wholesale and flips the ready flag; [`get`](Self::get) hands
/// out the current snapshot without blocking. Individual mutations never
/// write through here — callers re-initialize from a fresh fetch when they
/// want the cache to catch up.
pub(crate) struct ResourceCache<T> {
    items: ArcSwap<Vec<T>>,
    ready: watch::Sender<bool>,
}

impl<T> ResourceCache<T> {
    pub(crate) fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self { items: ArcSwap::from_pointee(Vec::new()), ready }
    }

    /// Wholesale-replace the contents and mark the cache ready.
    pub(crate) fn initialize(&self, items: Vec<T>) {
        self.items.store(Arc::new(items));
        self.ready.send_modify(|r| *r = true);
    }

    /// Current snapshot. Empty until the first [`initialize`](Self::initialize).
    pub(crate) fn get(&self) -> Arc<Vec<T>> {
        self.items.load_full()
    }

    pub(crate) fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub(crate) fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    /// Drop the contents and the ready flag. Used on sign-out.
    pub(crate) fn clear(&self) {
        self.items.store(Arc::new(Vec::new()));
        self.ready.send_modify(|r| *r = false);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_not_ready() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        assert!(cache.get().is_empty());
        assert!(!cache.is_ready());
    }

    #[test]
    fn initialize_replaces_wholesale() {
        let cache = ResourceCache::new();
        cache.initialize(vec![1, 2, 3]);
        assert!(cache.is_ready());
        assert_eq!(*cache.get(), [1, 2, 3]);

        cache.initialize(vec![9]);
        assert_eq!(*cache.get(), [9]);
    }

    #[test]
    fn old_snapshots_survive_reinitialization() {
        let cache = ResourceCache::new();
        cache.initialize(vec![1, 2]);
        let held = cache.get();
        cache.initialize(vec![3]);
        assert_eq!(*held, [1, 2]);
        assert_eq!(*cache.get(), [3]);
    }

    #[tokio::test]
    async fn ready_flag_is_observable() {
        let cache: ResourceCache<u32> = ResourceCache::new();
        let mut ready = cache.subscribe_ready();
        assert!(!*ready.borrow());

        cache.initialize(Vec::new());
        ready.changed().await.unwrap();
        assert!(*ready.borrow());

        cache.clear();
        ready.changed().await.unwrap();
        assert!(!*ready.borrow());
        assert!(!cache.is_ready());
    }
}
