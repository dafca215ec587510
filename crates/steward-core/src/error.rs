//! Error types for steward operations.
//!
//! Event-handling paths never surface these to callers: the engine treats
//! every failure there as "skip the optional side effect, keep going". Errors
//! are returned only from lifecycle operations (scheduler creation, start,
//! shutdown) and from collaborator trait calls.

use thiserror::Error;

use crate::types::DestinationId;

/// Result type alias for steward operations.
pub type StewardResult<T> = Result<T, StewardError>;

/// Main error type for all steward operations.
#[derive(Error, Debug)]
pub enum StewardError {
    /// The routing table resolved a category to a destination that the
    /// notification surface could not find a live endpoint for.
    #[error("unresolved destination: {0}")]
    UnresolvedDestination(DestinationId),

    /// The notification surface failed to deliver or retract a record.
    #[error("surface error: {message}")]
    Surface {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Background scheduler operation failed.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StewardError {
    /// Create a surface error without an underlying source.
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
            source: None,
        }
    }

    /// Create a scheduler error.
    pub fn scheduler(message: impl Into<String>) -> Self {
        Self::Scheduler(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_display() {
        let err = StewardError::surface("endpoint gone");
        assert!(err.to_string().contains("endpoint gone"));
    }

    #[test]
    fn test_unresolved_destination_display() {
        let err = StewardError::UnresolvedDestination(DestinationId::new(42));
        assert!(err.to_string().contains("42"));
    }
}
