//! Resolver error types

/// Error type for discovery operations
#[derive(Debug, Clone)]
pub enum ResolveError {
    /// The discovery service failed to enumerate visible streams
    ///
    /// Treated as transient: the discovery loop swallows it and retries on
    /// the next cycle with the catalog unchanged.
    Enumeration(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Enumeration(message) => {
                write!(f, "stream enumeration failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ResolveError {}
