//! A single reorder pass over one playlist
//!
//! The pass reads a snapshot from the provider, locates the playback
//! boundary, runs both reorder engines and submits the resulting moves one
//! at a time. Each move presents the snapshot id returned by the previous
//! one, so moves for one playlist are strictly sequential.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::metrics;
use crate::provider::PlaylistProvider;
use crate::reorder::{locate_playing_index, ReorderPlan};

use super::error::ManagerResult;

/// Why a pass did not reorder anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The user is not playing anything
    NothingPlaying,

    /// The playing track is not part of the playlist
    TrackNotInPlaylist { track_id: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingPlaying => write!(f, "nothing is playing"),
            Self::TrackNotInPlaylist { track_id } => {
                write!(f, "playing track {track_id} is not in the playlist")
            }
        }
    }
}

/// Result of a pass that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    /// Reorder engines ran and every relocation was accepted
    Completed {
        playing_index: usize,
        relocations: usize,
    },

    /// No playback boundary, nothing was touched
    Skipped { reason: SkipReason },
}

impl PassOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Skipped { .. } => "skipped",
        }
    }

    fn relocations(&self) -> usize {
        match self {
            Self::Completed { relocations, .. } => *relocations,
            Self::Skipped { .. } => 0,
        }
    }
}

/// Run one reorder pass
///
/// `hint` is the playing index found by the previous pass of this playlist.
/// The returned outcome carries the index found by this pass.
pub async fn run_pass(
    provider: &dyn PlaylistProvider,
    playlist_id: &str,
    hint: usize,
) -> ManagerResult<PassOutcome> {
    let started = Instant::now();
    let result = execute(provider, playlist_id, hint).await;
    let elapsed = started.elapsed().as_secs_f64();

    match &result {
        Ok(outcome) => metrics::record_pass(outcome.label(), outcome.relocations(), elapsed),
        Err(_) => metrics::record_pass("failed", 0, elapsed),
    }

    result
}

async fn execute(
    provider: &dyn PlaylistProvider,
    playlist_id: &str,
    hint: usize,
) -> ManagerResult<PassOutcome> {
    tracing::debug!(playlist_id = %playlist_id, hint, "Starting reorder pass");

    let mut snapshot = provider.snapshot_id(playlist_id).await?;
    let items = provider.playlist_items(playlist_id).await?;

    let Some(playing) = provider.currently_playing().await? else {
        return Ok(skip(playlist_id, SkipReason::NothingPlaying));
    };

    let Some(playing_index) = locate_playing_index(&items, &playing, hint) else {
        return Ok(skip(
            playlist_id,
            SkipReason::TrackNotInPlaylist { track_id: playing },
        ));
    };

    let plan = ReorderPlan::build(&items, playing_index)?;

    if plan.is_noop() {
        tracing::debug!(
            playlist_id = %playlist_id,
            playing_index,
            unplayed = plan.unplayed_len(),
            "Playlist already in fair order"
        );
        return Ok(PassOutcome::Completed {
            playing_index,
            relocations: 0,
        });
    }

    for op in &plan.relocations {
        snapshot = provider.move_track(playlist_id, *op, &snapshot).await?;
    }

    tracing::info!(
        playlist_id = %playlist_id,
        playing_index,
        relocations = plan.relocations.len(),
        snapshot = %snapshot,
        "Playlist reordered"
    );

    Ok(PassOutcome::Completed {
        playing_index,
        relocations: plan.relocations.len(),
    })
}

fn skip(playlist_id: &str, reason: SkipReason) -> PassOutcome {
    tracing::info!(playlist_id = %playlist_id, reason = %reason, "Skipping reorder pass");
    PassOutcome::Skipped { reason }
}
