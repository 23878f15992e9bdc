//! Error types for the onboarding flow.

use std::time::Duration;

/// Flat classification of every failure the flow can surface.
///
/// The alert boundary maps kinds (never raw error strings) to user-facing
/// text, so business logic stays testable without a UI harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Auth,
    Storage,
    Cancelled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Storage => "storage",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Top-level error type for the flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Resource gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Navigation error: {0}")]
    Nav(#[from] NavError),

    #[error("Picker error: {0}")]
    Pick(#[from] PickError),
}

impl Error {
    /// Classify this error for the presentation boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Gate(_) => ErrorKind::Network,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Persist(e) => e.kind(),
            Self::Nav(_) => ErrorKind::Validation,
            Self::Pick(e) => e.kind(),
        }
    }
}

/// Display-resource loading errors. Non-fatal: the gate logs them and the
/// flow continues.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Failed to load resource {name}: {reason}")]
    LoadFailed { name: String, reason: String },

    #[error("Resource {name} did not load within {timeout:?}")]
    TimedOut { name: String, timeout: Duration },
}

/// Local validation failures. Block submission; no external call is made.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Password is not strong enough")]
    WeakPassword,
}

/// Errors returned by the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Invalid identifier or password")]
    InvalidCredentials,

    #[error("No account is signed in")]
    NotSignedIn,

    #[error("An account already exists for {email}")]
    DuplicateEmail { email: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PersistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials | Self::NotSignedIn => ErrorKind::Auth,
            Self::DuplicateEmail { .. } | Self::Storage(_) | Self::Serialization(_) => {
                ErrorKind::Storage
            }
            Self::Network(_) => ErrorKind::Network,
        }
    }
}

/// Navigation errors. Refused transitions are logged and the active screen
/// is left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("No edge from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Navigation requested before the resource gate settled")]
    GateNotReady,

    #[error("No screen is mounted")]
    NothingMounted,
}

/// Picker failures. Distinct from cancellation, which is an ordinary
/// outcome (`Pick::Cancelled`), not an error.
#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("Picker was interrupted before a selection was made")]
    Interrupted,

    #[error("Picker unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PickError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Interrupted => ErrorKind::Cancelled,
            Self::Unavailable(_) | Self::Io(_) => ErrorKind::Storage,
        }
    }
}

/// Result type alias for the flow.
pub type Result<T> = std::result::Result<T, Error>;
