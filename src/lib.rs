//! # streamscout
//!
//! Discovery and subscription client for networked time-series streams.
//!
//! A [`Resolver`] polls an external [`DiscoveryService`] on a fixed cadence
//! and maintains a [`StreamCatalog`] of currently-visible streams, reporting
//! each appearance and disappearance exactly once. Consumers attach an
//! [`Inlet`] with a name/type [`StreamQuery`]; the inlet binds to the first
//! matching stream and drains `(sample, timestamp)` pairs from it through
//! the externally-provided connection service.
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamscout::{Inlet, Resolver, ResolverConfig, StreamQuery};
//! # use streamscout::{ConnectionFactory, DiscoveryService};
//! # fn demo(discovery: Arc<dyn DiscoveryService>,
//! #         connections: Arc<dyn ConnectionFactory<f32>>) -> Result<(), streamscout::InletError> {
//! let resolver = Resolver::new(discovery, ResolverConfig::default());
//! let _loop = resolver.spawn();
//!
//! let inlet = Inlet::<f32>::attach(
//!     resolver.catalog(),
//!     StreamQuery::new("EEG", "EEG"),
//!     connections,
//!     |stream| println!("bound to {stream}"),
//! )?;
//!
//! // on the consumer's own tick:
//! inlet.pull_samples(|sample, timestamp| {
//!     println!("{timestamp}: {sample:?}");
//! });
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod inlet;
pub mod resolver;

pub use descriptor::{StreamDescriptor, StreamQuery, IRREGULAR_RATE};
pub use inlet::{
    BindingPhase, ConnectionFactory, Inlet, InletConnection, InletError, InletStats, SampleChunk,
    SampleElement, NO_NEW_DATA,
};
pub use resolver::{
    CatalogDiff, DiscoveryService, ResolveError, Resolver, ResolverConfig, StreamCatalog,
    StreamObserver, SubscriptionId, DEFAULT_FORGET_AFTER, DEFAULT_POLL_INTERVAL,
};
