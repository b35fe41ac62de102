//! Inlet error types

/// Error type for inlet operations
#[derive(Debug, Clone)]
pub enum InletError {
    /// The connection service refused to open a connection to the stream
    OpenFailed {
        /// Name of the stream the open was attempted against
        stream: String,
        /// Service-provided reason
        message: String,
    },

    /// The connection primitive rejected the pull buffer or its shape
    ///
    /// Fatal for the binding that issued the pull: the inlet transitions to
    /// `Disabled` instead of retrying. Other bindings and the catalog are
    /// unaffected.
    InvalidArguments {
        /// Primitive-provided reason
        message: String,
    },
}

impl InletError {
    /// Create an open failure
    pub fn open_failed(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-arguments failure
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InletError::OpenFailed { stream, message } => {
                write!(f, "failed to open connection to '{}': {}", stream, message)
            }
            InletError::InvalidArguments { message } => {
                write!(f, "pull rejected: {}", message)
            }
        }
    }
}

impl std::error::Error for InletError {}
