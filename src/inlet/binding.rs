//! Inlet binding state machine
//!
//! An [`Inlet`] is one consumer's attachment to one matching stream. It
//! starts `Unbound`, binds to the first catalog entry satisfying its query
//! (either synchronously at attach time or on a later found event), and goes
//! `Disabled` for good when its stream vanishes or a pull fails. There is no
//! way back into `Bound`; a consumer that wants to reconnect attaches a new
//! inlet.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crate::descriptor::{StreamDescriptor, StreamQuery};
use crate::resolver::catalog::StreamCatalog;
use crate::resolver::events::{StreamObserver, SubscriptionId};

use super::connection::{ConnectionFactory, InletConnection, SampleChunk, NO_NEW_DATA};
use super::element::SampleElement;
use super::error::InletError;
use super::stats::InletStats;

/// Lifecycle phase of an inlet binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingPhase {
    /// Waiting for a matching stream to appear
    Unbound,
    /// Connected to a stream, pulls are live
    Bound,
    /// Terminal: stream lost or pull failed, all events ignored
    Disabled,
}

/// Mutable part of a binding, behind the inlet's lock
struct BindingState<T: SampleElement> {
    phase: BindingPhase,
    descriptor: Option<StreamDescriptor>,
    connection: Option<Box<dyn InletConnection<T>>>,
    expected_channels: usize,
    stats: InletStats,
}

struct InletInner<T: SampleElement> {
    query: StreamQuery,
    factory: Arc<dyn ConnectionFactory<T>>,
    on_available: Box<dyn Fn(&StreamDescriptor) + Send + Sync>,
    state: Mutex<BindingState<T>>,
}

impl<T: SampleElement> InletInner<T> {
    /// Open a connection and transition to Bound
    ///
    /// Returns `Ok(false)` without side effects when the binding is no
    /// longer `Unbound`. The channel count is captured from the descriptor
    /// here and never re-read afterwards.
    fn bind(&self, descriptor: &StreamDescriptor) -> Result<bool, InletError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.phase != BindingPhase::Unbound {
                return Ok(false);
            }

            let connection = self.factory.open(descriptor)?;
            state.connection = Some(connection);
            state.descriptor = Some(descriptor.clone());
            state.expected_channels = descriptor.channel_count;
            state.phase = BindingPhase::Bound;
        }

        tracing::info!(
            stream = %descriptor,
            channels = descriptor.channel_count,
            "Inlet bound"
        );
        (self.on_available)(descriptor);
        Ok(true)
    }

    /// Drop the connection and enter the terminal phase
    fn disable(&self) {
        let mut state = self.state.lock().unwrap();
        state.connection = None;
        state.phase = BindingPhase::Disabled;
    }

    fn handle_lost(&self, descriptor: &StreamDescriptor) {
        let mut state = self.state.lock().unwrap();
        if state.phase != BindingPhase::Bound {
            return;
        }
        // Bound descriptors are catalog entries, so name is their identity
        let is_bound_stream = state
            .descriptor
            .as_ref()
            .is_some_and(|bound| bound.name == descriptor.name);
        if !is_bound_stream {
            return;
        }

        state.connection = None;
        state.phase = BindingPhase::Disabled;
        drop(state);

        tracing::info!(stream = %descriptor, "Bound stream lost, inlet disabled");
    }
}

/// Catalog observer forwarding events into the binding
///
/// Holds a weak reference so a dropped inlet does not linger in the catalog's
/// observer list beyond its next notification.
struct CatalogHook<T: SampleElement>(Weak<InletInner<T>>);

impl<T: SampleElement> StreamObserver for CatalogHook<T> {
    fn on_found(&self, descriptor: &StreamDescriptor) {
        let Some(inner) = self.0.upgrade() else {
            return;
        };
        if !inner.query.matches(descriptor) {
            return;
        }
        if let Err(error) = inner.bind(descriptor) {
            tracing::error!(
                stream = %descriptor,
                %error,
                "Opening connection failed, disabling inlet"
            );
            inner.disable();
        }
    }

    fn on_lost(&self, descriptor: &StreamDescriptor) {
        if let Some(inner) = self.0.upgrade() {
            inner.handle_lost(descriptor);
        }
    }
}

/// Consumer-side attachment to one matching stream
///
/// Created with [`attach`](Self::attach); pulls are consumer-driven via
/// [`pull_samples`](Self::pull_samples) and [`pull_chunk`](Self::pull_chunk).
/// Dropping the inlet unsubscribes it from the catalog and closes the
/// connection if one is open.
pub struct Inlet<T: SampleElement> {
    inner: Arc<InletInner<T>>,
    catalog: Arc<StreamCatalog>,
    subscription: SubscriptionId,
}

impl<T: SampleElement> Inlet<T> {
    /// Attach a new binding to the catalog
    ///
    /// `on_available` is invoked once when the binding transitions to
    /// `Bound`; consumers typically start their pull tick from it. If the
    /// catalog already holds a matching stream the binding binds here,
    /// synchronously, and a failed connection open is returned as an error.
    /// Otherwise the binding stays `Unbound` until a matching found event
    /// arrives.
    pub fn attach(
        catalog: &Arc<StreamCatalog>,
        query: StreamQuery,
        factory: Arc<dyn ConnectionFactory<T>>,
        on_available: impl Fn(&StreamDescriptor) + Send + Sync + 'static,
    ) -> Result<Self, InletError> {
        if query.is_unconstrained() {
            tracing::warn!("Inlet query has neither name nor type, it will never bind");
        }

        let inner = Arc::new(InletInner {
            query,
            factory,
            on_available: Box::new(on_available),
            state: Mutex::new(BindingState {
                phase: BindingPhase::Unbound,
                descriptor: None,
                connection: None,
                expected_channels: 0,
                stats: InletStats::new(),
            }),
        });

        let hook: Arc<dyn StreamObserver> = Arc::new(CatalogHook(Arc::downgrade(&inner)));
        let subscription = catalog.subscribe(hook);

        if let Some(descriptor) = catalog.snapshot_match(&inner.query) {
            inner.bind(&descriptor)?;
        }

        Ok(Self {
            inner,
            catalog: Arc::clone(catalog),
            subscription,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> BindingPhase {
        self.inner.state.lock().unwrap().phase
    }

    /// Whether the binding is currently bound
    pub fn is_bound(&self) -> bool {
        self.phase() == BindingPhase::Bound
    }

    /// Whether the binding reached its terminal phase
    pub fn is_disabled(&self) -> bool {
        self.phase() == BindingPhase::Disabled
    }

    /// Descriptor of the bound stream, if bound (or disabled after binding)
    pub fn descriptor(&self) -> Option<StreamDescriptor> {
        self.inner.state.lock().unwrap().descriptor.clone()
    }

    /// Channel count captured at bind time, 0 before binding
    pub fn expected_channels(&self) -> usize {
        self.inner.state.lock().unwrap().expected_channels
    }

    /// The binding's matching query
    pub fn query(&self) -> &StreamQuery {
        &self.inner.query
    }

    /// Pull counters for this binding
    pub fn stats(&self) -> InletStats {
        self.inner.state.lock().unwrap().stats.clone()
    }

    /// Drain every buffered sample, one at a time
    ///
    /// Calls the connection's non-blocking pull primitive until it reports
    /// [`NO_NEW_DATA`], handing each `(sample, timestamp)` to `handler`.
    /// Returns the number of samples delivered; 0 when not bound. A rejected
    /// pull is fatal: the binding disables itself and stops pulling for good.
    pub fn pull_samples<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(&[T], f64),
    {
        // The connection is taken out of the shared state for the duration of
        // the drain so a concurrent lost event never waits on a pull.
        let (mut connection, channels) = {
            let mut state = self.inner.state.lock().unwrap();
            if state.phase != BindingPhase::Bound {
                return 0;
            }
            match state.connection.take() {
                Some(connection) => (connection, state.expected_channels),
                None => return 0,
            }
        };

        let mut buffer = vec![T::default(); channels];
        let mut delivered = 0usize;
        let mut last_timestamp = NO_NEW_DATA;
        let mut fatal = None;

        loop {
            match connection.pull_sample(&mut buffer, Duration::ZERO) {
                Ok(timestamp) if timestamp == NO_NEW_DATA => break,
                Ok(timestamp) => {
                    handler(&buffer, timestamp);
                    last_timestamp = timestamp;
                    delivered += 1;
                }
                Err(error) => {
                    fatal = Some(error);
                    break;
                }
            }
        }

        let mut state = self.inner.state.lock().unwrap();
        state.stats.samples_pulled += delivered as u64;
        if delivered > 0 {
            state.stats.last_timestamp = last_timestamp;
        }

        if let Some(error) = fatal {
            tracing::error!(%error, "Pulling samples failed, disabling inlet");
            state.phase = BindingPhase::Disabled;
            // connection dropped here instead of being restored
        } else if state.phase == BindingPhase::Bound {
            state.connection = Some(connection);
        }

        delivered
    }

    /// Pull everything currently buffered in one call
    ///
    /// Only meaningful for element types with chunk support (`f32`); for all
    /// others this is a no-op returning `None`. Returns `None` without
    /// allocating when nothing is buffered. A rejected pull disables the
    /// binding, as with [`pull_samples`](Self::pull_samples).
    pub fn pull_chunk(&self) -> Option<SampleChunk<T>> {
        if !T::SUPPORTS_CHUNKS {
            return None;
        }

        let (mut connection, channels) = {
            let mut state = self.inner.state.lock().unwrap();
            if state.phase != BindingPhase::Bound {
                return None;
            }
            match state.connection.take() {
                Some(connection) => (connection, state.expected_channels),
                None => return None,
            }
        };

        let available = connection.samples_available();
        if available == 0 {
            let mut state = self.inner.state.lock().unwrap();
            if state.phase == BindingPhase::Bound {
                state.connection = Some(connection);
            }
            return None;
        }

        let mut samples = vec![T::default(); channels * available];
        let mut timestamps = vec![NO_NEW_DATA; available];
        let result = connection.pull_chunk(&mut samples, &mut timestamps);

        let mut state = self.inner.state.lock().unwrap();
        match result {
            Ok(returned) => {
                samples.truncate(channels * returned);
                timestamps.truncate(returned);

                state.stats.chunks_pulled += 1;
                if let Some(&timestamp) = timestamps.last() {
                    state.stats.last_timestamp = timestamp;
                }
                if state.phase == BindingPhase::Bound {
                    state.connection = Some(connection);
                }

                Some(SampleChunk::new(channels, samples, timestamps))
            }
            Err(error) => {
                tracing::error!(%error, "Pulling chunk failed, disabling inlet");
                state.phase = BindingPhase::Disabled;
                None
            }
        }
    }
}

impl<T: SampleElement> Drop for Inlet<T> {
    fn drop(&mut self) {
        self.catalog.unsubscribe(self.subscription);
    }
}
