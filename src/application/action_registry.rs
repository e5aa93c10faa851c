// Registry of live notification actions, so chat buttons can be resolved after delivery
use crate::application::renderer::{ActionSet, LocationAction};
use crate::domain::notification::{ActionKind, NotificationId};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::time::Duration;

/// Keeps each delivered `ActionSet` invokable until it expires or is evicted.
///
/// Bounded by `capacity` live notifications; past that the least recently
/// used one is dropped. Records behind the actions are immutable and shared,
/// so a resolved action is invoked outside the cache.
pub struct ActionRegistry {
    cache: Cache<NotificationId, ActionSet>,
}

impl ActionRegistry {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { cache }
    }

    pub fn register(&self, actions: ActionSet) -> NotificationId {
        let id = NotificationId::new();
        self.cache.insert(id, actions);
        id
    }

    pub fn resolve(&self, id: NotificationId, kind: ActionKind) -> Option<LocationAction> {
        self.cache.get(&id).map(|actions| actions.get(kind).clone())
    }

    /// Drops an entry whose notification never reached the chat.
    pub fn forget(&self, id: NotificationId) {
        self.cache.invalidate(&id);
    }

    #[cfg(test)]
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
