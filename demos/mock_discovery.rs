//! In-memory discovery demo
//!
//! Run with: cargo run --example mock_discovery
//!
//! Simulates a publisher that comes and goes: an in-memory discovery service
//! announces an 8-channel "EEG" stream, hides it after a few seconds, and the
//! resolver/inlet pair reacts — found, bound, samples pulled, lost, disabled.
//! Sample data is synthesized by the in-memory connection service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use streamscout::{
    ConnectionFactory, DiscoveryService, Inlet, InletConnection, InletError, ResolveError,
    Resolver, ResolverConfig, StreamDescriptor, StreamQuery, NO_NEW_DATA,
};

/// Discovery service backed by a mutable in-memory stream list
struct MemoryDiscovery {
    visible: Mutex<Vec<StreamDescriptor>>,
}

impl MemoryDiscovery {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            visible: Mutex::new(Vec::new()),
        })
    }

    fn announce(&self, descriptor: StreamDescriptor) {
        self.visible.lock().unwrap().push(descriptor);
    }

    fn hide(&self, name: &str) {
        self.visible.lock().unwrap().retain(|d| d.name != name);
    }
}

impl DiscoveryService for MemoryDiscovery {
    fn visible_streams(
        &self,
        _forget_after: Duration,
    ) -> Result<Vec<StreamDescriptor>, ResolveError> {
        Ok(self.visible.lock().unwrap().clone())
    }
}

/// Connection that synthesizes a few samples of a ramp signal per pull tick
struct RampConnection {
    channels: usize,
    next_index: u64,
    pending: usize,
}

impl InletConnection<f32> for RampConnection {
    fn pull_sample(&mut self, buffer: &mut [f32], _timeout: Duration) -> Result<f64, InletError> {
        if self.pending == 0 {
            // Refill on the next tick
            self.pending = 4;
            return Ok(NO_NEW_DATA);
        }
        self.pending -= 1;
        self.next_index += 1;
        for (channel, slot) in buffer.iter_mut().enumerate() {
            *slot = (self.next_index as f32) + (channel as f32) / 10.0;
        }
        Ok(self.next_index as f64 / 250.0)
    }

    fn samples_available(&self) -> usize {
        self.pending
    }

    fn pull_chunk(
        &mut self,
        samples: &mut [f32],
        timestamps: &mut [f64],
    ) -> Result<usize, InletError> {
        let mut written = 0;
        while written < timestamps.len() && self.pending > 0 {
            self.pending -= 1;
            self.next_index += 1;
            for channel in 0..self.channels {
                samples[written * self.channels + channel] =
                    (self.next_index as f32) + (channel as f32) / 10.0;
            }
            timestamps[written] = self.next_index as f64 / 250.0;
            written += 1;
        }
        Ok(written)
    }
}

struct RampFactory;

impl ConnectionFactory<f32> for RampFactory {
    fn open(
        &self,
        descriptor: &StreamDescriptor,
    ) -> Result<Box<dyn InletConnection<f32>>, InletError> {
        Ok(Box::new(RampConnection {
            channels: descriptor.channel_count,
            next_index: 0,
            pending: 4,
        }))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let discovery = MemoryDiscovery::new();
    let resolver = Resolver::new(
        discovery.clone(),
        ResolverConfig::default().poll_interval(Duration::from_millis(100)),
    );
    let loop_handle = resolver.spawn();

    let inlet = Inlet::<f32>::attach(
        resolver.catalog(),
        StreamQuery::new("EEG", "EEG"),
        Arc::new(RampFactory),
        |stream| println!("inlet bound to {stream}"),
    )
    .expect("attach");

    println!("waiting for a stream to appear...");
    tokio::time::sleep(Duration::from_secs(1)).await;

    discovery.announce(
        StreamDescriptor::new("EEG", "EEG")
            .channel_count(8)
            .uid("demo-uid")
            .host_name("demo-host")
            .nominal_rate(250.0),
    );

    // Consumer tick: drain whatever is buffered, ten times
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let pulled = inlet.pull_samples(|sample, timestamp| {
            println!("  t={timestamp:.4}  first channel={:.1}", sample[0]);
        });
        println!("tick: pulled {pulled} samples (bound={})", inlet.is_bound());
    }

    println!("publisher goes away...");
    discovery.hide("EEG");
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!(
        "inlet disabled={} after {} samples total",
        inlet.is_disabled(),
        inlet.stats().samples_pulled
    );

    resolver.stop();
    loop_handle.await.expect("discovery loop");
}
