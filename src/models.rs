//! Core data structures shared by the reorder engines, providers and manager
//!
//! A playlist pass works on two views of the same tracks:
//!
//! - [`PlaylistItem`] - what the remote provider reports (track id + contributor)
//! - [`TrackEntry`] / [`Ordering`] - the same items tagged with a reference position

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// Provider-facing types
// ============================================================================

/// A single playlist row as reported by the remote provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Provider track identifier
    pub track_id: String,

    /// Identifier of the user who added the track
    pub added_by: String,
}

impl PlaylistItem {
    /// Create a new playlist item
    pub fn new(track_id: impl Into<String>, added_by: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            added_by: added_by.into(),
        }
    }
}

/// A playlist owned by or visible to the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Playlist identifier
    pub id: String,

    /// Identifier of the owning user
    pub owner_id: String,
}

/// Opaque playlist version used by the provider to detect conflicting edits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Track Entry
// ============================================================================

/// A track tagged with its position in some reference ordering
///
/// `track_id` and `contributor_id` never change. `position` is contextual:
/// in the current ordering it equals the array index, in a target ordering
/// it records the index the track held before reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub position: usize,
    pub contributor_id: String,
    pub track_id: String,
}

impl TrackEntry {
    /// Create a new track entry
    pub fn new(
        position: usize,
        contributor_id: impl Into<String>,
        track_id: impl Into<String>,
    ) -> Self {
        Self {
            position,
            contributor_id: contributor_id.into(),
            track_id: track_id.into(),
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// An ordered sequence of track entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ordering(Vec<TrackEntry>);

impl Ordering {
    pub fn new(entries: Vec<TrackEntry>) -> Self {
        Self(entries)
    }

    /// Build an identity-tagged ordering (each position equals its index)
    pub fn from_items(items: &[PlaylistItem]) -> Self {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| TrackEntry::new(index, &item.added_by, &item.track_id))
            .collect()
    }

    /// Track ids in sequence order
    pub fn track_ids(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.track_id.as_str()).collect()
    }

    /// Position tags in sequence order
    pub fn positions(&self) -> Vec<usize> {
        self.0.iter().map(|e| e.position).collect()
    }

    /// Whether two orderings hold the same track sequence, ignoring position tags
    pub fn same_tracks_as(&self, other: &Ordering) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(a, b)| a.track_id == b.track_id)
    }

    /// Entries from `start` to the end, as a new ordering
    pub fn suffix(&self, start: usize) -> Ordering {
        Self(self.0.get(start..).map(<[_]>::to_vec).unwrap_or_default())
    }

    /// Append the entries of another ordering
    pub fn extend(&mut self, other: Ordering) {
        self.0.extend(other.0);
    }

    pub fn into_inner(self) -> Vec<TrackEntry> {
        self.0
    }
}

impl Deref for Ordering {
    type Target = [TrackEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<TrackEntry>> for Ordering {
    fn from(entries: Vec<TrackEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<TrackEntry> for Ordering {
    fn from_iter<I: IntoIterator<Item = TrackEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Ordering {
    type Item = TrackEntry;
    type IntoIter = std::vec::IntoIter<TrackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ordering {
    type Item = &'a TrackEntry;
    type IntoIter = std::slice::Iter<'a, TrackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Relocation Op
// ============================================================================

/// Move the element at `from` so that it ends up at index `to`
///
/// Elements strictly between the two indices shift one slot toward the
/// vacated gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelocationOp {
    pub from: usize,
    pub to: usize,
}

impl RelocationOp {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Whether the op leaves the sequence unchanged
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Whether both indices are valid for a sequence of `len` elements
    pub fn fits(&self, len: usize) -> bool {
        self.from < len && self.to < len
    }
}

impl fmt::Display for RelocationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<PlaylistItem> {
        vec![
            PlaylistItem::new("A1", "alice"),
            PlaylistItem::new("B1", "bob"),
            PlaylistItem::new("A2", "alice"),
        ]
    }

    #[test]
    fn test_from_items_is_identity_tagged() {
        let ordering = Ordering::from_items(&items());
        assert_eq!(ordering.positions(), vec![0, 1, 2]);
        assert_eq!(ordering.track_ids(), vec!["A1", "B1", "A2"]);
        assert_eq!(ordering[1].contributor_id, "bob");
    }

    #[test]
    fn test_suffix_past_end_is_empty() {
        let ordering = Ordering::from_items(&items());
        assert_eq!(ordering.suffix(1).len(), 2);
        assert!(ordering.suffix(3).is_empty());
        assert!(ordering.suffix(10).is_empty());
    }

    #[test]
    fn test_same_tracks_ignores_positions() {
        let a = Ordering::new(vec![TrackEntry::new(0, "x", "T1"), TrackEntry::new(1, "y", "T2")]);
        let b = Ordering::new(vec![TrackEntry::new(7, "x", "T1"), TrackEntry::new(3, "y", "T2")]);
        assert!(a.same_tracks_as(&b));
        assert!(!a.same_tracks_as(&b.suffix(1)));
    }

    #[test]
    fn test_relocation_op_bounds() {
        let op = RelocationOp::new(3, 1);
        assert!(op.fits(4));
        assert!(!op.fits(3));
        assert!(!op.is_noop());
        assert_eq!(op.to_string(), "3 -> 1");
    }

    #[test]
    fn test_ordering_serializes_as_array() {
        let ordering = Ordering::new(vec![TrackEntry::new(0, "alice", "A1")]);
        let json = serde_json::to_string(&ordering).unwrap();
        assert!(json.starts_with('['));
    }
}
