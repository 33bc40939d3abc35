//! Ban event fan-out.
//!
//! Subscribers register a typed observer and are notified after every
//! successful insert. Publish is fire-and-forget: observers receive a shared
//! reference to the stored snapshot and cannot fail the insert path.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entry::BanEntry;

/// Observer notified when a ban is added.
pub trait BanObserver: Send + Sync {
    /// Called with a snapshot of the newly stored entry.
    fn on_ban_added(&self, entry: &BanEntry);
}

/// Fan-out list of [`BanObserver`]s.
#[derive(Default)]
pub struct BanEventBus {
    observers: RwLock<Vec<Arc<dyn BanObserver>>>,
}

impl BanEventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Observers are invoked in subscription order.
    pub fn subscribe(&self, observer: Arc<dyn BanObserver>) {
        self.observers.write().push(observer);
    }

    /// Notify all observers of a new ban.
    pub fn publish_added(&self, entry: &BanEntry) {
        // Snapshot the list so an observer may subscribe during delivery
        let observers: Vec<_> = self.observers.read().clone();
        for observer in observers {
            observer.on_ban_added(entry);
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        seen: AtomicUsize,
    }

    impl BanObserver for Counter {
        fn on_ban_added(&self, _entry: &BanEntry) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_publish_reaches_all_observers() {
        let bus = BanEventBus::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        bus.subscribe(a.clone());
        bus.subscribe(b.clone());
        assert_eq!(bus.observer_count(), 2);

        let entry = BanEntry::new("*", "203.0.113.9", "test", 0, 0);
        bus.publish_added(&entry);
        bus.publish_added(&entry);

        assert_eq!(a.seen.load(Ordering::SeqCst), 2);
        assert_eq!(b.seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_publish_without_observers_is_noop() {
        let bus = BanEventBus::new();
        let entry = BanEntry::new("*", "203.0.113.9", "test", 0, 0);
        bus.publish_added(&entry);
    }
}
