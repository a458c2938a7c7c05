//! Error types for the reschedule ecosystem.

use std::fmt;

use thiserror::Error;

/// The remote calendar operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    ListEvents,
    ConflictCheck,
    PatchEvent,
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteCall::ListEvents => "Listing events",
            RemoteCall::ConflictCheck => "Conflict check",
            RemoteCall::PatchEvent => "Update",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while listing, validating or rescheduling events.
#[derive(Error, Debug)]
pub enum RescheduleError {
    /// A time window whose end is not after its start.
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Business rules or settings that make validation meaningless.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The client identity artifact is missing or unreadable.
    #[error("{0}")]
    AuthConfiguration(String),

    /// Token refresh or the interactive grant failed.
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("{call} failed: {message}")]
    RemoteApi { call: RemoteCall, message: String },
}

impl RescheduleError {
    pub fn remote(call: RemoteCall, err: impl fmt::Display) -> Self {
        RescheduleError::RemoteApi {
            call,
            message: err.to_string(),
        }
    }

    /// Whether the error ends the session.
    ///
    /// Conflict-check and patch failures are reported inline and the flow
    /// continues; everything else stops the program.
    pub fn is_fatal(&self) -> bool {
        match self {
            RescheduleError::RemoteApi { call, .. } => *call == RemoteCall::ListEvents,
            _ => true,
        }
    }
}

/// Result type alias for reschedule operations.
pub type RescheduleResult<T> = Result<T, RescheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_failure_is_fatal() {
        let err = RescheduleError::remote(RemoteCall::ListEvents, "quota exceeded");
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Listing events failed: quota exceeded");
    }

    #[test]
    fn conflict_and_patch_failures_are_recoverable() {
        assert!(!RescheduleError::remote(RemoteCall::ConflictCheck, "timeout").is_fatal());
        assert!(!RescheduleError::remote(RemoteCall::PatchEvent, "503").is_fatal());
    }

    #[test]
    fn auth_errors_are_fatal() {
        assert!(RescheduleError::AuthConfiguration("missing".into()).is_fatal());
        assert!(RescheduleError::AuthFailure("denied".into()).is_fatal());
    }
}
