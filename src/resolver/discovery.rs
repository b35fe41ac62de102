//! Discovery loop
//!
//! The [`Resolver`] drives the catalog on a fixed cadence using an external
//! [`DiscoveryService`]. Each cycle's full enumeration result is handed to
//! `reconcile` whole; nothing is skipped or coalesced. A failing enumeration
//! is swallowed and retried next cycle with the catalog untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::catalog::{CatalogDiff, StreamCatalog};
use super::config::ResolverConfig;
use super::error::ResolveError;
use crate::descriptor::StreamDescriptor;

/// Network discovery abstraction consumed by the resolver
///
/// Implementations report the full set of streams currently visible on the
/// network. A stream that has gone unannounced for longer than `forget_after`
/// must be omitted from the result.
pub trait DiscoveryService: Send + Sync {
    /// Enumerate currently visible streams
    fn visible_streams(
        &self,
        forget_after: Duration,
    ) -> Result<Vec<StreamDescriptor>, ResolveError>;
}

/// Periodic discovery driver for one [`StreamCatalog`]
///
/// Hosts with their own scheduler can call [`poll_once`](Self::poll_once)
/// directly; otherwise [`spawn`](Self::spawn) runs the loop as a background
/// task until [`stop`](Self::stop) is called.
pub struct Resolver {
    catalog: Arc<StreamCatalog>,
    discovery: Arc<dyn DiscoveryService>,
    config: ResolverConfig,
    running: AtomicBool,
}

impl Resolver {
    /// Create a resolver over a fresh catalog
    pub fn new(discovery: Arc<dyn DiscoveryService>, config: ResolverConfig) -> Arc<Self> {
        Arc::new(Self {
            catalog: Arc::new(StreamCatalog::new()),
            discovery,
            config,
            running: AtomicBool::new(false),
        })
    }

    /// The catalog this resolver maintains
    pub fn catalog(&self) -> &Arc<StreamCatalog> {
        &self.catalog
    }

    /// The resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether the background loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Request the background loop to stop
    ///
    /// Cooperative: the flag is checked at the top of each cycle, so an
    /// in-flight enumeration completes before the loop exits.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Run one discovery cycle
    ///
    /// Enumerates visible streams and reconciles the catalog. On enumeration
    /// failure the catalog is left unchanged and an empty diff is returned;
    /// the caller (or the background loop) simply tries again next cycle.
    pub fn poll_once(&self) -> CatalogDiff {
        match self.discovery.visible_streams(self.config.forget_after) {
            Ok(visible) => self.catalog.reconcile(visible),
            Err(error) => {
                tracing::warn!(%error, "Stream enumeration failed, retrying next cycle");
                CatalogDiff::default()
            }
        }
    }

    /// Spawn the discovery loop as a background task
    ///
    /// Returns the task handle; the loop runs every `poll_interval` until
    /// [`stop`](Self::stop) is called.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let resolver = Arc::clone(self);
        resolver.running.store(true, Ordering::Relaxed);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(resolver.config.poll_interval);
            tracing::debug!(
                poll_interval_ms = resolver.config.poll_interval.as_millis() as u64,
                forget_after_ms = resolver.config.forget_after.as_millis() as u64,
                "Discovery loop started"
            );

            loop {
                ticker.tick().await;
                if !resolver.is_running() {
                    break;
                }
                resolver.poll_once();
            }

            tracing::debug!("Discovery loop stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scriptable discovery service: pops one enumeration result per cycle,
    /// repeating the last one when the script runs out.
    struct ScriptedDiscovery {
        script: Mutex<Vec<Result<Vec<StreamDescriptor>, ResolveError>>>,
        last: Mutex<Result<Vec<StreamDescriptor>, ResolveError>>,
    }

    impl ScriptedDiscovery {
        fn new(script: Vec<Result<Vec<StreamDescriptor>, ResolveError>>) -> Arc<Self> {
            let mut script = script;
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                last: Mutex::new(Ok(Vec::new())),
            })
        }
    }

    impl DiscoveryService for ScriptedDiscovery {
        fn visible_streams(
            &self,
            _forget_after: Duration,
        ) -> Result<Vec<StreamDescriptor>, ResolveError> {
            let mut script = self.script.lock().unwrap();
            if let Some(next) = script.pop() {
                *self.last.lock().unwrap() = next.clone();
            }
            self.last.lock().unwrap().clone()
        }
    }

    fn desc(name: &str) -> StreamDescriptor {
        StreamDescriptor::new(name, "T")
    }

    #[test]
    fn test_poll_once_reconciles() {
        let discovery = ScriptedDiscovery::new(vec![
            Ok(vec![desc("A")]),
            Ok(vec![desc("A"), desc("B")]),
        ]);
        let resolver = Resolver::new(discovery, ResolverConfig::default());

        let diff = resolver.poll_once();
        assert_eq!(diff.found.len(), 1);

        let diff = resolver.poll_once();
        assert_eq!(diff.found.len(), 1);
        assert_eq!(resolver.catalog().names(), vec!["A", "B"]);
    }

    #[test]
    fn test_enumeration_failure_is_transient() {
        let discovery = ScriptedDiscovery::new(vec![
            Ok(vec![desc("A")]),
            Err(ResolveError::Enumeration("multicast socket closed".into())),
            Ok(vec![desc("A")]),
        ]);
        let resolver = Resolver::new(discovery, ResolverConfig::default());

        resolver.poll_once();
        assert_eq!(resolver.catalog().len(), 1);

        // Failed cycle leaves the catalog as it was
        let diff = resolver.poll_once();
        assert!(diff.is_empty());
        assert_eq!(resolver.catalog().len(), 1);

        // Next cycle recovers without re-announcing the cached stream
        let diff = resolver.poll_once();
        assert!(diff.is_empty());
        assert_eq!(resolver.catalog().len(), 1);
    }

    #[test]
    fn test_spawn_and_stop() {
        tokio_test::block_on(async {
            let discovery = ScriptedDiscovery::new(vec![Ok(vec![desc("A")])]);
            let resolver = Resolver::new(
                discovery,
                ResolverConfig::default().poll_interval(Duration::from_millis(5)),
            );

            let handle = resolver.spawn();
            assert!(resolver.is_running());

            // Give the loop a few cycles to pick the stream up
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(resolver.catalog().contains("A"));

            resolver.stop();
            handle.await.unwrap();
            assert!(!resolver.is_running());
        });
    }
}
