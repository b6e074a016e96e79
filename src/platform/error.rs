//! Platform error types

use thiserror::Error;

/// Messaging platform error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PlatformError {
    pub kind: PlatformErrorKind,
    pub message: String,
}

impl PlatformError {
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Network, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Rejected, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Unknown, message)
    }
}

/// Error classification, used for logging only: the menu never retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// Network issues, timeouts
    Network,
    /// The platform refused the call (message deleted, permissions changed)
    Rejected,
    /// Unknown error
    Unknown,
}

impl PlatformErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network)
    }
}
