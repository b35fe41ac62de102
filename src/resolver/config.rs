//! Resolver configuration

use std::time::Duration;

/// Interval between discovery poll cycles unless overridden
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a stream may go unannounced before the discovery service stops
/// reporting it, unless overridden
pub const DEFAULT_FORGET_AFTER: Duration = Duration::from_secs(1);

/// Configuration for a [`Resolver`](super::Resolver) instance
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Cadence of the discovery loop
    pub poll_interval: Duration,

    /// Forget timeout passed to the discovery service on each enumeration
    pub forget_after: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            forget_after: DEFAULT_FORGET_AFTER,
        }
    }
}

impl ResolverConfig {
    /// Set the poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the forget timeout
    pub fn forget_after(mut self, forget_after: Duration) -> Self {
        self.forget_after = forget_after;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();

        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.forget_after, Duration::from_secs(1));
    }

    #[test]
    fn test_builder_chaining() {
        let config = ResolverConfig::default()
            .poll_interval(Duration::from_millis(50))
            .forget_after(Duration::from_secs(5));

        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.forget_after, Duration::from_secs(5));
    }
}
