//! Error types for the playlist manager

use thiserror::Error;

use crate::provider::ProviderError;
use crate::reorder::OrderingError;

/// Result type for manager operations
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Playlist manager errors
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The playlist is missing or owned by someone else
    #[error("Playlist {playlist_id} does not belong to user {user_id}")]
    PlaylistDoesNotBelongToUser {
        playlist_id: String,
        user_id: String,
    },

    /// The playlist is not currently managed
    #[error("Playlist {0} is not managed")]
    NotManaged(String),

    /// Remote provider call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Reorder engines rejected the snapshot
    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),
}

impl ManagerError {
    /// Create an ownership error
    pub fn not_owned(playlist_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::PlaylistDoesNotBelongToUser {
            playlist_id: playlist_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Check if a later attempt may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_recoverable(),
            Self::PlaylistDoesNotBelongToUser { .. } | Self::NotManaged(_) | Self::Ordering(_) => {
                false
            }
        }
    }
}
