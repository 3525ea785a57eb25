//! Remote playlist providers
//!
//! The manager talks to the outside world only through [`PlaylistProvider`].
//!
//! - [`http`] - Spotify-shaped Web API client over reqwest
//! - [`memory`] - In-process provider for dry runs and tests

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::models::{PlaylistItem, PlaylistSummary, RelocationOp, SnapshotId};

pub use http::HttpPlaylistProvider;
pub use memory::InMemoryProvider;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while talking to a playlist provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The playlist changed since the snapshot id was issued
    #[error("Snapshot conflict on playlist {playlist_id}")]
    SnapshotConflict { playlist_id: String },

    /// Provider asked us to slow down
    #[error("Rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Unexpected status code
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Failure injected by the in-memory provider
    #[error("Simulated failure: {0}")]
    Simulated(String),
}

impl ProviderError {
    /// Check if the error is transient
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_)
            | Self::SnapshotConflict { .. }
            | Self::RateLimited { .. }
            | Self::Simulated(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::NotFound(_) | Self::InvalidResponse(_) => false,
        }
    }
}

/// Operations a reorder pass needs from a remote playlist service
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    /// Identifier of the authenticated user
    async fn current_user_id(&self) -> ProviderResult<String>;

    /// Playlists visible to the authenticated user
    async fn user_playlists(&self) -> ProviderResult<Vec<PlaylistSummary>>;

    /// All rows of a playlist in their current order
    async fn playlist_items(&self, playlist_id: &str) -> ProviderResult<Vec<PlaylistItem>>;

    /// Current concurrency token of a playlist
    async fn snapshot_id(&self, playlist_id: &str) -> ProviderResult<SnapshotId>;

    /// Track id the user is currently playing, if any
    async fn currently_playing(&self) -> ProviderResult<Option<String>>;

    /// Move one track and return the playlist's new snapshot id
    async fn move_track(
        &self,
        playlist_id: &str,
        op: RelocationOp,
        snapshot: &SnapshotId,
    ) -> ProviderResult<SnapshotId>;
}
