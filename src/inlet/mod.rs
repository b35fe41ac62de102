//! Typed stream inlets
//!
//! An inlet is the consumer side of one stream: a binding that waits for a
//! matching stream to be discovered, opens a data connection to it, and then
//! drains time-stamped multi-channel samples on the consumer's own tick.
//!
//! # Lifecycle
//!
//! ```text
//!              matching found event,
//!              or cache hit at attach
//!   Unbound ──────────────────────────► Bound
//!      │                                  │ bound stream lost,
//!      │ (lost events ignored)            │ or fatal pull error
//!      │                                  ▼
//!      └────────── (no transition) ──► Disabled  (terminal)
//! ```
//!
//! One pull algorithm serves every element type via [`SampleElement`]; the
//! chunked bulk path exists for `f32` data only and is a no-op elsewhere.

pub mod binding;
pub mod connection;
pub mod element;
pub mod error;
pub mod stats;

pub use binding::{BindingPhase, Inlet};
pub use connection::{ConnectionFactory, InletConnection, SampleChunk, NO_NEW_DATA};
pub use element::SampleElement;
pub use error::InletError;
pub use stats::InletStats;
