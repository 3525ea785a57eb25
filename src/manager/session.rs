//! Per-playlist session records
//!
//! A session belongs to exactly one managed playlist. It carries the last
//! known playing index between passes together with pass counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pass::PassOutcome;

/// State owned by one managed playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSession {
    /// Playlist identifier
    pub playlist_id: String,

    /// Where the playing track was found on the last successful lookup
    pub last_playing_index: usize,

    /// When management started
    pub managed_since: DateTime<Utc>,

    /// When the last pass finished
    pub last_pass_at: Option<DateTime<Utc>>,

    /// Passes that ran the reorder engines
    pub passes_completed: u64,

    /// Passes skipped because no playback boundary was found
    pub passes_skipped: u64,

    /// Passes abandoned on error
    pub passes_failed: u64,

    /// Relocations accepted by the provider
    pub relocations_applied: u64,

    /// Message of the most recent failure
    pub last_error: Option<String>,
}

impl PlaylistSession {
    /// Create a new session
    pub fn new(playlist_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            last_playing_index: 0,
            managed_since: Utc::now(),
            last_pass_at: None,
            passes_completed: 0,
            passes_skipped: 0,
            passes_failed: 0,
            relocations_applied: 0,
            last_error: None,
        }
    }

    /// Fold a pass outcome into the session
    pub fn record_outcome(&mut self, outcome: &PassOutcome) {
        self.last_pass_at = Some(Utc::now());
        match outcome {
            PassOutcome::Completed {
                playing_index,
                relocations,
            } => {
                self.last_playing_index = *playing_index;
                self.passes_completed += 1;
                self.relocations_applied += *relocations as u64;
                self.last_error = None;
            }
            PassOutcome::Skipped { .. } => {
                self.passes_skipped += 1;
            }
        }
    }

    /// Record a failed pass
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.last_pass_at = Some(Utc::now());
        self.passes_failed += 1;
        self.last_error = Some(error.into());
    }

    /// Total passes attempted
    pub fn total_passes(&self) -> u64 {
        self.passes_completed + self.passes_skipped + self.passes_failed
    }
}
