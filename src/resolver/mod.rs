//! Stream resolver
//!
//! Continuous discovery of streams visible on the network, with an
//! event-based surface for consumers.
//!
//! # Architecture
//!
//! ```text
//!   DiscoveryService          Arc<StreamCatalog>
//!   ┌───────────────┐   ┌──────────────────────────┐
//!   │ visible_      │   │ known: Vec<Descriptor>   │
//!   │  streams()    ├──►│ (name-keyed, insertion   │
//!   └───────▲───────┘   │  ordered)                │
//!           │           └──────────┬───────────────┘
//!     Resolver::spawn              │ on_lost then on_found
//!     (tokio interval,             ▼
//!      poll_once each tick)   [StreamObserver] [StreamObserver] ...
//! ```
//!
//! Each cycle the resolver enumerates the full visible set and the catalog
//! diffs it against its cache: vanished entries are evicted and reported lost
//! first, new entries are admitted and reported found, unchanged entries stay
//! silent. Transitions are therefore delivered exactly once, and a stream
//! that remains visible never flickers even when its metadata drifts.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;

pub use catalog::{CatalogDiff, StreamCatalog};
pub use config::{ResolverConfig, DEFAULT_FORGET_AFTER, DEFAULT_POLL_INTERVAL};
pub use discovery::{DiscoveryService, Resolver};
pub use error::ResolveError;
pub use events::{StreamObserver, SubscriptionId};
