//! Reorder plan assembly
//!
//! Combines the playback boundary with both engines: the played prefix stays
//! where it is, the unplayed suffix is replaced by its fair order, and the
//! diff between the two full orderings becomes the plan's relocations.

use serde::{Deserialize, Serialize};

use crate::models::{Ordering, PlaylistItem, RelocationOp};

use super::diff::compute_relocations;
use super::error::{OrderingError, OrderingResult};
use super::fair::compute_fair_order;

/// Find the index of the currently playing track
///
/// The search starts at `hint` (the last known playing index) so a track that
/// appears several times resolves to the occurrence playback has reached. If
/// the track is not found at or after the hint, the rest of the playlist is
/// searched from the start. Returns `None` when the track is absent.
pub fn locate_playing_index(items: &[PlaylistItem], track_id: &str, hint: usize) -> Option<usize> {
    let start = hint.min(items.len());
    items[start..]
        .iter()
        .position(|item| item.track_id == track_id)
        .map(|offset| start + offset)
        .or_else(|| items[..start].iter().position(|item| item.track_id == track_id))
}

/// A fully computed reorder pass for one playlist snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPlan {
    /// Index of the currently playing track
    pub playing_index: usize,

    /// Identity-tagged snapshot ordering
    pub current: Ordering,

    /// Played prefix followed by the fair order of the unplayed suffix
    pub target: Ordering,

    /// Moves that transform `current` into `target`
    pub relocations: Vec<RelocationOp>,
}

impl ReorderPlan {
    /// Build the plan for a snapshot whose track at `playing_index` is playing
    pub fn build(items: &[PlaylistItem], playing_index: usize) -> OrderingResult<Self> {
        if playing_index >= items.len() {
            return Err(OrderingError::BoundaryOutOfRange {
                index: playing_index,
                len: items.len(),
            });
        }

        let current = Ordering::from_items(items);
        let boundary = playing_index + 1;

        let mut target: Ordering = current.iter().take(boundary).cloned().collect();
        target.extend(compute_fair_order(&current.suffix(boundary)));

        let relocations = compute_relocations(&current, &target)?;

        Ok(Self {
            playing_index,
            current,
            target,
            relocations,
        })
    }

    /// Whether the playlist is already in fair order
    pub fn is_noop(&self) -> bool {
        self.relocations.is_empty()
    }

    /// Number of unplayed tracks covered by the plan
    pub fn unplayed_len(&self) -> usize {
        self.current.len() - (self.playing_index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(rows: &[(&str, &str)]) -> Vec<PlaylistItem> {
        rows.iter()
            .map(|(track, user)| PlaylistItem::new(*track, *user))
            .collect()
    }

    #[test]
    fn test_locate_from_hint() {
        let items = playlist(&[("X", "a"), ("Y", "b"), ("X", "a"), ("Z", "c")]);
        assert_eq!(locate_playing_index(&items, "X", 0), Some(0));
        assert_eq!(locate_playing_index(&items, "X", 1), Some(2));
        assert_eq!(locate_playing_index(&items, "Y", 3), Some(1));
        assert_eq!(locate_playing_index(&items, "N", 0), None);
        assert_eq!(locate_playing_index(&items, "Z", 99), Some(3));
        assert_eq!(locate_playing_index(&[], "Z", 0), None);
    }

    #[test]
    fn test_build_rejects_out_of_range_boundary() {
        let items = playlist(&[("A1", "a")]);
        assert_eq!(
            ReorderPlan::build(&items, 1),
            Err(OrderingError::BoundaryOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_build_keeps_played_prefix() {
        let items = playlist(&[
            ("B0", "b"),
            ("A1", "a"),
            ("A2", "a"),
            ("A3", "a"),
            ("B1", "b"),
        ]);
        let plan = ReorderPlan::build(&items, 1).unwrap();
        assert_eq!(plan.target.track_ids(), vec!["B0", "A1", "A2", "B1", "A3"]);
        assert_eq!(plan.relocations, vec![RelocationOp::new(4, 3)]);
        assert_eq!(plan.unplayed_len(), 3);
    }

    #[test]
    fn test_build_last_track_playing() {
        let items = playlist(&[("A1", "a"), ("A2", "a"), ("B1", "b")]);
        let plan = ReorderPlan::build(&items, 2).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.unplayed_len(), 0);
    }
}
