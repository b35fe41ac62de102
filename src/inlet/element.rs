//! Sample element types
//!
//! Every inlet is specialized over one element type from a fixed set. The
//! pull loop is generic over [`SampleElement`] so the algorithm exists once
//! instead of once per type.

/// Element type of a multi-channel sample
///
/// Implemented for the closed set of wire-supported element types: `f32`,
/// `f64`, `i32`, `i16`, `char` and `String`.
pub trait SampleElement: Clone + Default + Send + 'static {
    /// Whether the bulk chunk-pull path is implemented for this element type
    ///
    /// Only `f32` data supports chunked pulls; for every other type
    /// [`Inlet::pull_chunk`](super::Inlet::pull_chunk) is a no-op.
    const SUPPORTS_CHUNKS: bool = false;
}

impl SampleElement for f32 {
    const SUPPORTS_CHUNKS: bool = true;
}

impl SampleElement for f64 {}

impl SampleElement for i32 {}

impl SampleElement for i16 {}

impl SampleElement for char {}

impl SampleElement for String {}
