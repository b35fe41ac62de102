//! Connection service abstraction
//!
//! The transport underneath an inlet: opening a data connection to a
//! discovered stream and pulling samples off it. Implemented outside this
//! crate; the contract here is what the binding's pull loop relies on.

use std::time::Duration;

use crate::descriptor::StreamDescriptor;

use super::element::SampleElement;
use super::error::InletError;

/// Timestamp sentinel returned by `pull_sample` when nothing is buffered
pub const NO_NEW_DATA: f64 = 0.0;

/// Live data connection to one stream
///
/// Exclusively owned by the binding that opened it. `pull_sample` with a zero
/// timeout must return promptly, either with a sample or with
/// [`NO_NEW_DATA`]; it must never block indefinitely.
pub trait InletConnection<T: SampleElement>: Send {
    /// Pull one sample into `buffer` (one slot per channel)
    ///
    /// Returns the sample's timestamp, or [`NO_NEW_DATA`] when no sample was
    /// available within `timeout`. Rejects a buffer of the wrong shape with
    /// [`InletError::InvalidArguments`].
    fn pull_sample(&mut self, buffer: &mut [T], timeout: Duration) -> Result<f64, InletError>;

    /// Number of samples currently buffered on this connection
    fn samples_available(&self) -> usize;

    /// Pull all buffered samples in one call
    ///
    /// `samples` holds `channels * n` elements, sample-major; `timestamps`
    /// holds `n` slots. Returns the number of samples actually written.
    fn pull_chunk(&mut self, samples: &mut [T], timestamps: &mut [f64])
        -> Result<usize, InletError>;
}

/// Opens connections on behalf of inlet bindings
pub trait ConnectionFactory<T: SampleElement>: Send + Sync {
    /// Open a data connection to the described stream
    fn open(&self, descriptor: &StreamDescriptor) -> Result<Box<dyn InletConnection<T>>, InletError>;
}

/// Bulk of samples returned by one chunked pull
///
/// Samples are stored sample-major: sample `i` occupies
/// `samples[i * channels .. (i + 1) * channels]`, with `timestamps[i]` as its
/// timestamp.
#[derive(Debug, Clone)]
pub struct SampleChunk<T> {
    channels: usize,
    samples: Vec<T>,
    timestamps: Vec<f64>,
}

impl<T> SampleChunk<T> {
    pub(super) fn new(channels: usize, samples: Vec<T>, timestamps: Vec<f64>) -> Self {
        debug_assert_eq!(samples.len(), channels * timestamps.len());
        Self {
            channels,
            samples,
            timestamps,
        }
    }

    /// Number of samples in the chunk
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the chunk holds no samples
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Channels per sample
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// One sample's channel values
    pub fn sample(&self, index: usize) -> &[T] {
        &self.samples[index * self.channels..(index + 1) * self.channels]
    }

    /// Timestamp of one sample
    pub fn timestamp(&self, index: usize) -> f64 {
        self.timestamps[index]
    }

    /// All channel values, sample-major
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// All timestamps, parallel to [`samples`](Self::samples)
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }
}
