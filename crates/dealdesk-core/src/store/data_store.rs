// ── Central reactive data store ──
//
// Holds the few collections that are shared across screens for the
// lifetime of a session: reference caches populated at connect time and
// the plan catalog, which mutations keep current. Paged resources never
// land here; each screen owns its own accumulation.

use std::sync::Arc;

use tokio::sync::watch;

use super::cache::ResourceCache;
use super::collection::EntityCollection;
use crate::model::{AdminProfile, Category, Deal, EntityId, Plan};

pub struct DataStore {
    pub(crate) categories: ResourceCache<Category>,
    pub(crate) top_deals: ResourceCache<Deal>,
    pub(crate) plans: EntityCollection<Plan>,
    pub(crate) profile: watch::Sender<Option<Arc<AdminProfile>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (profile, _) = watch::channel(None);

        Self {
            categories: ResourceCache::new(),
            top_deals: ResourceCache::new(),
            plans: EntityCollection::new(),
            profile,
        }
    }

    // ── Categories ───────────────────────────────────────────────────

    /// Category cache snapshot, sorted by display position at load time.
    /// Empty until the session has connected.
    pub fn categories(&self) -> Arc<Vec<Category>> {
        self.categories.get()
    }

    pub fn categories_ready(&self) -> bool {
        self.categories.is_ready()
    }

    pub fn subscribe_categories_ready(&self) -> watch::Receiver<bool> {
        self.categories.subscribe_ready()
    }

    pub fn category_by_id(&self, id: &EntityId) -> Option<Category> {
        self.categories.get().iter().find(|c| c.id == *id).cloned()
    }

    // ── Top deals ────────────────────────────────────────────────────

    pub fn top_deals(&self) -> Arc<Vec<Deal>> {
        self.top_deals.get()
    }

    // ── Plans ────────────────────────────────────────────────────────

    pub fn plans_snapshot(&self) -> Arc<Vec<Arc<Plan>>> {
        self.plans.snapshot()
    }

    pub fn subscribe_plans(&self) -> watch::Receiver<Arc<Vec<Arc<Plan>>>> {
        self.plans.subscribe()
    }

    pub fn plan_by_id(&self, id: &EntityId) -> Option<Arc<Plan>> {
        self.plans.get(id)
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    // ── Profile ──────────────────────────────────────────────────────

    pub fn profile(&self) -> Option<Arc<AdminProfile>> {
        self.profile.borrow().clone()
    }

    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Arc<AdminProfile>>> {
        self.profile.subscribe()
    }

    pub(crate) fn set_profile(&self, profile: Option<AdminProfile>) {
        let profile = profile.map(Arc::new);
        self.profile.send_modify(|p| *p = profile);
    }

    /// Drop everything. Used on sign-out so the next session starts clean.
    pub(crate) fn clear(&self) {
        self.categories.clear();
        self.top_deals.clear();
        self.plans.clear();
        self.set_profile(None);
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_every_collection() {
        let store = DataStore::new();
        store.categories.initialize(vec![Category {
            id: EntityId::from("c1"),
            name: "Food".into(),
            description: String::new(),
            position: 0,
            parent_id: None,
            image_url: None,
        }]);
        store.set_profile(Some(AdminProfile {
            id: EntityId::from("u1"),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            photo_url: None,
            role: None,
        }));
        assert!(store.categories_ready());
        assert!(store.profile().is_some());

        store.clear();
        assert!(!store.categories_ready());
        assert!(store.categories().is_empty());
        assert!(store.profile().is_none());
        assert_eq!(store.plan_count(), 0);
    }

    #[test]
    fn category_lookup_clones_out_of_the_snapshot() {
        let store = DataStore::new();
        store.categories.initialize(vec![Category {
            id: EntityId::from("c9"),
            name: "Drinks".into(),
            description: String::new(),
            position: 1,
            parent_id: None,
            image_url: None,
        }]);
        let found = store.category_by_id(&EntityId::from("c9")).unwrap();
        assert_eq!(found.name, "Drinks");
        assert!(store.category_by_id(&EntityId::from("nope")).is_none());
    }
}
