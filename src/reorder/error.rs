//! Error types for the reorder engines

use thiserror::Error;

/// Result type for reorder operations
pub type OrderingResult<T> = Result<T, OrderingError>;

/// The current and target orderings do not describe the same tracks
///
/// This is a contract violation between the fair reorder engine and the diff
/// engine. It is never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InconsistentOrderingError {
    /// The orderings have a different number of entries
    #[error("orderings differ in length: current has {current}, target has {target}")]
    LengthMismatch { current: usize, target: usize },

    /// A target slot refers to a position the current ordering does not hold
    #[error("target slot {slot} refers to unknown position {position}")]
    UnknownPosition { slot: usize, position: usize },

    /// The same position tag appears twice in one ordering
    #[error("position {position} appears more than once")]
    DuplicatePosition { position: usize },

    /// A position tag maps to a different track in each ordering
    #[error("position {position} holds '{current}' but target expects '{target}'")]
    TrackMismatch {
        position: usize,
        current: String,
        target: String,
    },
}

/// Errors raised while building or replaying a reorder plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("inconsistent ordering: {0}")]
    Inconsistent(#[from] InconsistentOrderingError),

    /// A relocation op addresses an index outside the ordering
    #[error("relocation {from} -> {to} out of range for {len} entries")]
    RelocationOutOfRange { from: usize, to: usize, len: usize },

    /// The playback boundary lies outside the playlist
    #[error("playing index {index} out of range for {len} entries")]
    BoundaryOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_converts_into_ordering_error() {
        let err: OrderingError = InconsistentOrderingError::LengthMismatch {
            current: 3,
            target: 2,
        }
        .into();
        assert!(matches!(err, OrderingError::Inconsistent(_)));
        assert!(err.to_string().contains("current has 3"));
    }
}
