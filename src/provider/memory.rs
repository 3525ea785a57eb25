//! In-process playlist provider
//!
//! Keeps playlists in memory and applies moves with the same single-element
//! relocation semantics the remote API uses. Snapshot ids rotate on every
//! mutation and stale ids are rejected, so pass logic can be exercised
//! end to end without a network.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{PlaylistItem, PlaylistSummary, RelocationOp, SnapshotId};

use super::{PlaylistProvider, ProviderError, ProviderResult};

/// A move accepted by the in-memory provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub playlist_id: String,
    pub op: RelocationOp,
    /// Snapshot id the caller presented
    pub snapshot: SnapshotId,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug)]
struct MemoryPlaylist {
    owner_id: String,
    items: Vec<PlaylistItem>,
    version: u64,
}

impl MemoryPlaylist {
    fn snapshot(&self, playlist_id: &str) -> SnapshotId {
        SnapshotId(format!("{playlist_id}-v{}", self.version))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    user_id: String,
    playlists: HashMap<String, MemoryPlaylist>,
    playing: Option<String>,
    fail_next: u32,
    moves: Vec<MoveRecord>,
}

impl MemoryState {
    fn take_failure(&mut self, call: &str) -> ProviderResult<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(ProviderError::Simulated(call.to_string()));
        }
        Ok(())
    }

    fn playlist_mut(&mut self, playlist_id: &str) -> ProviderResult<&mut MemoryPlaylist> {
        self.playlists
            .get_mut(playlist_id)
            .ok_or_else(|| ProviderError::NotFound(playlist_id.to_string()))
    }
}

/// Playlist provider backed by in-process state
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    state: RwLock<MemoryState>,
}

impl InMemoryProvider {
    /// Create a provider authenticated as `user_id`
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                user_id: user_id.into(),
                ..Default::default()
            }),
        }
    }

    /// Add a playlist owned by `owner_id`
    pub fn with_playlist(
        mut self,
        playlist_id: impl Into<String>,
        owner_id: impl Into<String>,
        items: Vec<PlaylistItem>,
    ) -> Self {
        self.state.get_mut().playlists.insert(
            playlist_id.into(),
            MemoryPlaylist {
                owner_id: owner_id.into(),
                items,
                version: 1,
            },
        );
        self
    }

    /// Set the track reported as currently playing
    pub async fn set_playing(&self, track_id: Option<&str>) {
        self.state.write().await.playing = track_id.map(str::to_string);
    }

    /// Make the next `count` provider calls fail
    pub async fn fail_next(&self, count: u32) {
        self.state.write().await.fail_next = count;
    }

    /// Replace a playlist's rows, as another client editing it would
    pub async fn replace_items(&self, playlist_id: &str, items: Vec<PlaylistItem>) -> bool {
        let mut state = self.state.write().await;
        match state.playlists.get_mut(playlist_id) {
            Some(playlist) => {
                playlist.items = items;
                playlist.version += 1;
                true
            }
            None => false,
        }
    }

    /// Current rows of a playlist
    pub async fn items(&self, playlist_id: &str) -> Option<Vec<PlaylistItem>> {
        self.state
            .read()
            .await
            .playlists
            .get(playlist_id)
            .map(|p| p.items.clone())
    }

    /// Track ids of a playlist in order
    pub async fn track_ids(&self, playlist_id: &str) -> Option<Vec<String>> {
        self.items(playlist_id)
            .await
            .map(|items| items.into_iter().map(|i| i.track_id).collect())
    }

    /// Every move accepted so far
    pub async fn move_log(&self) -> Vec<MoveRecord> {
        self.state.read().await.moves.clone()
    }
}

#[async_trait::async_trait]
impl PlaylistProvider for InMemoryProvider {
    async fn current_user_id(&self) -> ProviderResult<String> {
        let mut state = self.state.write().await;
        state.take_failure("current_user_id")?;
        Ok(state.user_id.clone())
    }

    async fn user_playlists(&self) -> ProviderResult<Vec<PlaylistSummary>> {
        let mut state = self.state.write().await;
        state.take_failure("user_playlists")?;
        let mut playlists: Vec<PlaylistSummary> = state
            .playlists
            .iter()
            .map(|(id, p)| PlaylistSummary {
                id: id.clone(),
                owner_id: p.owner_id.clone(),
            })
            .collect();
        playlists.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(playlists)
    }

    async fn playlist_items(&self, playlist_id: &str) -> ProviderResult<Vec<PlaylistItem>> {
        let mut state = self.state.write().await;
        state.take_failure("playlist_items")?;
        Ok(state.playlist_mut(playlist_id)?.items.clone())
    }

    async fn snapshot_id(&self, playlist_id: &str) -> ProviderResult<SnapshotId> {
        let mut state = self.state.write().await;
        state.take_failure("snapshot_id")?;
        Ok(state.playlist_mut(playlist_id)?.snapshot(playlist_id))
    }

    async fn currently_playing(&self) -> ProviderResult<Option<String>> {
        let mut state = self.state.write().await;
        state.take_failure("currently_playing")?;
        Ok(state.playing.clone())
    }

    async fn move_track(
        &self,
        playlist_id: &str,
        op: RelocationOp,
        snapshot: &SnapshotId,
    ) -> ProviderResult<SnapshotId> {
        let mut state = self.state.write().await;
        state.take_failure("move_track")?;

        let playlist = state.playlist_mut(playlist_id)?;
        if playlist.snapshot(playlist_id) != *snapshot {
            return Err(ProviderError::SnapshotConflict {
                playlist_id: playlist_id.to_string(),
            });
        }
        if !op.fits(playlist.items.len()) {
            return Err(ProviderError::Status {
                status: 400,
                message: format!(
                    "relocation {op} out of range for {} items",
                    playlist.items.len()
                ),
            });
        }

        op.apply_to(&mut playlist.items);
        playlist.version += 1;
        let next = playlist.snapshot(playlist_id);

        state.moves.push(MoveRecord {
            playlist_id: playlist_id.to_string(),
            op,
            snapshot: snapshot.clone(),
            applied_at: Utc::now(),
        });

        Ok(next)
    }
}
