//! Unified error handling for the fairplay crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`FairplayErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use fairplay::error::{Error, FairplayErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Will retry on the next tick: {err}");
//!     } else {
//!         eprintln!("Fatal error: {err}");
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::manager::error::ManagerError;
pub use crate::provider::ProviderError;
pub use crate::reorder::error::{InconsistentOrderingError, OrderingError};
pub use crate::server::ServerError;

/// Common trait for all fairplay error types
pub trait FairplayErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later attempt may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Current and target orderings disagree
    Ordering,
    /// Remote provider errors (HTTP, rate limit, conflicts)
    Provider,
    /// Playlist ownership checks
    Ownership,
    /// Configuration and validation errors
    Config,
    /// Control API errors
    Server,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short label for logs and API responses
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ordering => "ordering",
            Self::Provider => "provider",
            Self::Ownership => "ownership",
            Self::Config => "config",
            Self::Server => "server",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the fairplay crate
#[derive(Error, Debug)]
pub enum Error {
    /// Reorder engine errors
    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    /// Remote provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Playlist manager errors
    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    /// Control API errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<InconsistentOrderingError> for Error {
    fn from(err: InconsistentOrderingError) -> Self {
        Self::Ordering(err.into())
    }
}

impl FairplayErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Ordering(_) => false,
            Self::Provider(e) => e.is_recoverable(),
            Self::Manager(e) => e.is_recoverable(),
            Self::Server(_) => false,
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) => false,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Ordering(_) => ErrorCategory::Ordering,
            Self::Provider(_) => ErrorCategory::Provider,
            Self::Manager(e) => match e {
                ManagerError::PlaylistDoesNotBelongToUser { .. } => ErrorCategory::Ownership,
                ManagerError::Provider(_) => ErrorCategory::Provider,
                ManagerError::Ordering(_) => ErrorCategory::Ordering,
                ManagerError::NotManaged(_) => ErrorCategory::Other,
            },
            Self::Server(_) => ErrorCategory::Server,
            Self::Io(_) | Self::Json(_) | Self::Other { .. } => ErrorCategory::Other,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let ordering: Error = InconsistentOrderingError::LengthMismatch {
            current: 2,
            target: 1,
        }
        .into();
        assert_eq!(ordering.category(), ErrorCategory::Ordering);
        assert!(!ordering.is_recoverable());

        let ownership: Error = ManagerError::not_owned("P1", "U1").into();
        assert_eq!(ownership.category(), ErrorCategory::Ownership);
        assert!(!ownership.is_recoverable());
    }

    #[test]
    fn test_provider_errors_recoverable() {
        let err: Error = ProviderError::SnapshotConflict {
            playlist_id: "P1".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(err.is_recoverable());

        let nested: Error = ManagerError::Provider(ProviderError::RateLimited {
            retry_after_secs: Some(1),
        })
        .into();
        assert_eq!(nested.category(), ErrorCategory::Provider);
        assert!(nested.is_recoverable());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing access token");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.category().label(), "config");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "Something went wrong");
    }
}
