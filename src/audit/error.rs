use thiserror::Error;

#[derive(Debug, Clone, Error)]
/// Failure classes for reasoning-service calls.
///
/// Only [`AuditError::Transient`] is worth retrying; everything else fails
/// the attempt immediately.
pub enum AuditError {
    /// Rate limiting, quota exhaustion, or temporary provider unavailability.
    #[error("transient provider failure: {message}")]
    Transient {
        /// Provider error message.
        message: String,
    },

    /// Malformed request, authentication failure, or any other error where
    /// a retry is futile.
    #[error("permanent provider failure: {message}")]
    Permanent {
        /// Provider error message.
        message: String,
    },
}

impl AuditError {
    /// Returns `true` if a retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuditError::Transient { .. })
    }

    /// Shorthand for a transient failure.
    pub fn transient(message: impl Into<String>) -> Self {
        AuditError::Transient {
            message: message.into(),
        }
    }

    /// Shorthand for a permanent failure.
    pub fn permanent(message: impl Into<String>) -> Self {
        AuditError::Permanent {
            message: message.into(),
        }
    }
}
