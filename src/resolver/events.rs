//! Found/lost event surface
//!
//! The catalog multicasts stream transitions to an explicit, ordered list of
//! observers. Delivery is synchronous on the context that drives
//! `reconcile`, lost before found within a cycle.

use std::sync::Arc;

use crate::descriptor::StreamDescriptor;

/// Receiver of catalog transitions
///
/// Implementations must tolerate being called from the discovery loop's task.
/// Each transition is delivered exactly once per subscriber.
pub trait StreamObserver: Send + Sync {
    /// A stream appeared that was not in the catalog last cycle
    fn on_found(&self, descriptor: &StreamDescriptor);

    /// A cached stream vanished from the visible set
    fn on_lost(&self, descriptor: &StreamDescriptor);
}

/// Handle identifying one subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered observer list
///
/// Observers are notified in subscription order. Kept behind the catalog's
/// lock; dispatch happens on a snapshot so observers may call back into the
/// catalog.
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn StreamObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, observer: Arc<dyn StreamObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Remove a subscription; returns false if the id was already gone
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn StreamObserver>> {
        self.entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        log: Mutex<Vec<String>>,
    }

    impl StreamObserver for Recorder {
        fn on_found(&self, descriptor: &StreamDescriptor) {
            self.log.lock().unwrap().push(format!("found {}", descriptor.name));
        }

        fn on_lost(&self, descriptor: &StreamDescriptor) {
            self.log.lock().unwrap().push(format!("lost {}", descriptor.name));
        }
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut registry = ObserverRegistry::new();
        let observer = Arc::new(Recorder {
            log: Mutex::new(Vec::new()),
        });

        let id = registry.subscribe(observer.clone());
        assert_eq!(registry.snapshot().len(), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.snapshot().is_empty());

        // Second unsubscribe is a no-op
        assert!(!registry.unsubscribe(id));
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut registry = ObserverRegistry::new();
        let first = Arc::new(Recorder {
            log: Mutex::new(Vec::new()),
        });
        let second = Arc::new(Recorder {
            log: Mutex::new(Vec::new()),
        });

        registry.subscribe(first.clone());
        registry.subscribe(second.clone());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);

        let descriptor = StreamDescriptor::new("A", "B");
        snapshot[0].on_found(&descriptor);
        assert_eq!(first.log.lock().unwrap().len(), 1);
        assert_eq!(second.log.lock().unwrap().len(), 0);
    }
}
