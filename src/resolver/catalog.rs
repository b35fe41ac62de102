//! Stream catalog
//!
//! The catalog is the resolver's in-memory cache of currently-visible
//! streams. Each poll cycle hands it the full visible set; the catalog diffs
//! that against its cache, evicts vanished entries, admits new ones, and
//! multicasts the transitions to its observers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::descriptor::{StreamDescriptor, StreamQuery};

use super::events::{ObserverRegistry, StreamObserver, SubscriptionId};

/// Result of one reconciliation cycle
///
/// Lost entries come before found entries so callers can process them in
/// notification order.
#[derive(Debug, Clone, Default)]
pub struct CatalogDiff {
    /// Cached entries that vanished from the visible set this cycle
    pub lost: Vec<StreamDescriptor>,

    /// Visible entries that were not cached before this cycle
    pub found: Vec<StreamDescriptor>,
}

impl CatalogDiff {
    /// Whether this cycle changed nothing
    pub fn is_empty(&self) -> bool {
        self.lost.is_empty() && self.found.is_empty()
    }
}

/// Cache of currently-visible stream descriptors
///
/// Entries are kept in insertion order and deduplicated by `name`: two
/// distinct streams sharing a name collapse to one entry, matching the
/// name-keyed lookup semantics of [`StreamQuery`]. Mutation (`reconcile`) and
/// reads (`snapshot_match`, event dispatch) serialize on an internal lock, so
/// observers always see a consistent cache.
pub struct StreamCatalog {
    known: Mutex<Vec<StreamDescriptor>>,
    observers: Mutex<ObserverRegistry>,
}

impl StreamCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            known: Mutex::new(Vec::new()),
            observers: Mutex::new(ObserverRegistry::new()),
        }
    }

    /// Synchronous lookup against the current cache
    ///
    /// Returns the first entry satisfying the query, in insertion order, or
    /// `None`. An unconstrained query matches nothing.
    pub fn snapshot_match(&self, query: &StreamQuery) -> Option<StreamDescriptor> {
        let known = self.known.lock().unwrap();
        known.iter().find(|entry| query.matches(entry)).cloned()
    }

    /// Whether a stream with the given name is currently cached
    pub fn contains(&self, name: &str) -> bool {
        let known = self.known.lock().unwrap();
        known.iter().any(|entry| entry.name == name)
    }

    /// Names of all cached streams, in insertion order
    pub fn names(&self) -> Vec<String> {
        let known = self.known.lock().unwrap();
        known.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Number of cached streams
    pub fn len(&self) -> usize {
        self.known.lock().unwrap().len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.known.lock().unwrap().is_empty()
    }

    /// Register an observer for found/lost transitions
    ///
    /// Observers are notified in subscription order, synchronously on the
    /// context that drives [`reconcile`](Self::reconcile).
    pub fn subscribe(&self, observer: Arc<dyn StreamObserver>) -> SubscriptionId {
        self.observers.lock().unwrap().subscribe(observer)
    }

    /// Remove a subscription; returns false if it was already removed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.lock().unwrap().unsubscribe(id)
    }

    /// Apply one poll cycle's full visible set
    ///
    /// Every cached entry whose name is absent from `visible` is evicted and
    /// reported lost; every visible entry whose name is not yet cached is
    /// appended and reported found. Entries present on both sides are left
    /// untouched even if their metadata changed, so a stream that stays
    /// visible never flickers. Lost notifications are dispatched before found
    /// notifications, each in reconciliation iteration order, with the cache
    /// lock released.
    pub fn reconcile(&self, visible: Vec<StreamDescriptor>) -> CatalogDiff {
        let diff = {
            let mut known = self.known.lock().unwrap();

            let visible_names: HashSet<&str> =
                visible.iter().map(|entry| entry.name.as_str()).collect();

            let mut lost = Vec::new();
            known.retain(|entry| {
                if visible_names.contains(entry.name.as_str()) {
                    true
                } else {
                    lost.push(entry.clone());
                    false
                }
            });

            let mut found = Vec::new();
            for entry in visible {
                // Checked against the updated cache so duplicate names within
                // one visible set collapse to the first occurrence.
                if !known.iter().any(|cached| cached.name == entry.name) {
                    known.push(entry.clone());
                    found.push(entry);
                }
            }

            CatalogDiff { lost, found }
        };

        if !diff.is_empty() {
            self.dispatch(&diff);
        }

        diff
    }

    /// Notify observers of a diff, lost before found
    fn dispatch(&self, diff: &CatalogDiff) {
        let observers = self.observers.lock().unwrap().snapshot();

        for descriptor in &diff.lost {
            tracing::info!(stream = %descriptor, "Stream lost");
            for observer in &observers {
                observer.on_lost(descriptor);
            }
        }

        for descriptor in &diff.found {
            tracing::info!(
                stream = %descriptor,
                channels = descriptor.channel_count,
                host = %descriptor.host_name,
                "Found new stream"
            );
            for observer in &observers {
                observer.on_found(descriptor);
            }
        }
    }
}

impl Default for StreamCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn desc(name: &str, stream_type: &str) -> StreamDescriptor {
        StreamDescriptor::new(name, stream_type).channel_count(4)
    }

    /// Observer that records transition order as "lost:X" / "found:X"
    struct Recorder {
        log: StdMutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                log: StdMutex::new(Vec::new()),
            })
        }

        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl StreamObserver for Recorder {
        fn on_found(&self, descriptor: &StreamDescriptor) {
            self.log
                .lock()
                .unwrap()
                .push(format!("found:{}", descriptor.name));
        }

        fn on_lost(&self, descriptor: &StreamDescriptor) {
            self.log
                .lock()
                .unwrap()
                .push(format!("lost:{}", descriptor.name));
        }
    }

    #[test]
    fn test_catalog_mirrors_last_visible_set() {
        let catalog = StreamCatalog::new();

        catalog.reconcile(vec![desc("A", "T"), desc("B", "T")]);
        assert_eq!(catalog.names(), vec!["A", "B"]);

        catalog.reconcile(vec![desc("B", "T"), desc("C", "T")]);
        assert_eq!(catalog.names(), vec!["B", "C"]);

        catalog.reconcile(Vec::new());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_lost_dispatched_before_found() {
        let catalog = StreamCatalog::new();
        let recorder = Recorder::new();
        catalog.subscribe(recorder.clone());

        catalog.reconcile(vec![desc("A", "T")]);
        // A disappears and B appears in the same cycle
        catalog.reconcile(vec![desc("B", "T")]);

        assert_eq!(recorder.entries(), vec!["found:A", "lost:A", "found:B"]);
    }

    #[test]
    fn test_no_flicker_on_metadata_change() {
        let catalog = StreamCatalog::new();
        let recorder = Recorder::new();
        catalog.subscribe(recorder.clone());

        catalog.reconcile(vec![desc("A", "T").channel_count(4)]);
        // Same name, different metadata: neither found nor lost, no refresh
        let diff = catalog.reconcile(vec![desc("A", "T").channel_count(8)]);

        assert!(diff.is_empty());
        assert_eq!(recorder.entries(), vec!["found:A"]);
        let cached = catalog.snapshot_match(&StreamQuery::by_name("A")).unwrap();
        assert_eq!(cached.channel_count, 4);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let catalog = StreamCatalog::new();

        let diff = catalog.reconcile(vec![
            desc("A", "T").uid("first"),
            desc("A", "T").uid("second"),
        ]);

        assert_eq!(diff.found.len(), 1);
        assert_eq!(catalog.len(), 1);
        let cached = catalog.snapshot_match(&StreamQuery::by_name("A")).unwrap();
        assert_eq!(cached.uid, "first");
    }

    #[test]
    fn test_snapshot_match_insertion_order() {
        let catalog = StreamCatalog::new();

        catalog.reconcile(vec![desc("A", "EEG"), desc("B", "EEG")]);

        let hit = catalog.snapshot_match(&StreamQuery::by_type("EEG")).unwrap();
        assert_eq!(hit.name, "A");
    }

    #[test]
    fn test_snapshot_match_unconstrained() {
        let catalog = StreamCatalog::new();
        catalog.reconcile(vec![desc("A", "T")]);

        assert!(catalog.snapshot_match(&StreamQuery::default()).is_none());
    }

    #[test]
    fn test_unsubscribed_observer_is_silent() {
        let catalog = StreamCatalog::new();
        let recorder = Recorder::new();
        let id = catalog.subscribe(recorder.clone());

        catalog.reconcile(vec![desc("A", "T")]);
        assert!(catalog.unsubscribe(id));
        catalog.reconcile(Vec::new());

        assert_eq!(recorder.entries(), vec!["found:A"]);
    }

    #[test]
    fn test_reentrant_read_during_dispatch() {
        // An observer may consult the catalog while a notification is being
        // delivered; the cache lock is not held across dispatch.
        struct Prober {
            catalog: Arc<StreamCatalog>,
            seen: StdMutex<bool>,
        }

        impl StreamObserver for Prober {
            fn on_found(&self, descriptor: &StreamDescriptor) {
                *self.seen.lock().unwrap() = self.catalog.contains(&descriptor.name);
            }

            fn on_lost(&self, _descriptor: &StreamDescriptor) {}
        }

        let catalog = Arc::new(StreamCatalog::new());
        let prober = Arc::new(Prober {
            catalog: catalog.clone(),
            seen: StdMutex::new(false),
        });
        catalog.subscribe(prober.clone());

        catalog.reconcile(vec![desc("A", "T")]);
        assert!(*prober.seen.lock().unwrap());
    }
}
