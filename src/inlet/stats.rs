//! Per-inlet statistics

/// Counters for one inlet binding
#[derive(Debug, Clone, Default)]
pub struct InletStats {
    /// Samples delivered through the single-sample pull loop
    pub samples_pulled: u64,

    /// Chunked pulls that returned at least one sample
    pub chunks_pulled: u64,

    /// Timestamp of the most recently pulled sample (0.0 until the first)
    pub last_timestamp: f64,
}

impl InletStats {
    /// Create a zeroed stats tracker
    pub fn new() -> Self {
        Self::default()
    }
}
