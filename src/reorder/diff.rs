//! Permutation diff between the current and target orderings
//!
//! The diff walks the target left to right. At each index it either finds the
//! right track already in place, or pulls it forward from further right with
//! a single relocation. Entries are matched by position tag, so repeated
//! track ids are still told apart.

use std::collections::HashMap;

use crate::models::{Ordering, RelocationOp, TrackEntry};

use super::error::{InconsistentOrderingError, OrderingError, OrderingResult};

/// Compute the relocations that turn `current` into `target`
///
/// `current` carries each entry's own position tag (normally its index);
/// `target` carries the tag of the current entry it designates. Replaying the
/// returned ops in order with [`RelocationOp::apply_to`] semantics yields the
/// target track sequence.
///
/// Entries are matched by position tag, never by track id. Orderings with
/// equal track-id sequences need no ops only when the ids are unique: with
/// repeats, swapping two copies of the same track still costs a relocation.
///
/// # Errors
///
/// Returns [`InconsistentOrderingError`] when the two orderings do not hold
/// the same tracks.
pub fn compute_relocations(
    current: &Ordering,
    target: &Ordering,
) -> Result<Vec<RelocationOp>, InconsistentOrderingError> {
    verify_same_tracks(current, target)?;

    // Working copy of position tags, private to this computation.
    let mut working: Vec<usize> = current.positions();
    let mut ops = Vec::new();

    for (slot, wanted) in target.iter().enumerate() {
        if working[slot] == wanted.position {
            continue;
        }

        let from = working[slot + 1..]
            .iter()
            .position(|&tag| tag == wanted.position)
            .map(|offset| slot + 1 + offset)
            .ok_or(InconsistentOrderingError::UnknownPosition {
                slot,
                position: wanted.position,
            })?;

        let op = RelocationOp::new(from, slot);
        op.apply_to(&mut working);
        ops.push(op);
    }

    Ok(ops)
}

/// Replay relocations against an ordering, producing a new ordering
pub fn apply_relocations(ordering: &Ordering, ops: &[RelocationOp]) -> OrderingResult<Ordering> {
    let mut entries: Vec<TrackEntry> = ordering.to_vec();
    for op in ops {
        if !op.fits(entries.len()) {
            return Err(OrderingError::RelocationOutOfRange {
                from: op.from,
                to: op.to,
                len: entries.len(),
            });
        }
        op.apply_to(&mut entries);
    }
    Ok(Ordering::new(entries))
}

impl RelocationOp {
    /// Remove the element at `from` and re-insert it at `to`
    ///
    /// Callers must check [`RelocationOp::fits`] first.
    pub fn apply_to<T>(&self, items: &mut Vec<T>) {
        if self.is_noop() {
            return;
        }
        let item = items.remove(self.from);
        items.insert(self.to, item);
    }
}

fn verify_same_tracks(
    current: &Ordering,
    target: &Ordering,
) -> Result<(), InconsistentOrderingError> {
    if current.len() != target.len() {
        return Err(InconsistentOrderingError::LengthMismatch {
            current: current.len(),
            target: target.len(),
        });
    }

    let mut by_position: HashMap<usize, &TrackEntry> = HashMap::with_capacity(current.len());
    for entry in current.iter() {
        if by_position.insert(entry.position, entry).is_some() {
            return Err(InconsistentOrderingError::DuplicatePosition {
                position: entry.position,
            });
        }
    }

    // Consuming matches makes a repeated target tag show up as unknown.
    for (slot, wanted) in target.iter().enumerate() {
        let Some(found) = by_position.remove(&wanted.position) else {
            return Err(if current.iter().any(|e| e.position == wanted.position) {
                InconsistentOrderingError::DuplicatePosition {
                    position: wanted.position,
                }
            } else {
                InconsistentOrderingError::UnknownPosition {
                    slot,
                    position: wanted.position,
                }
            });
        };

        if found.track_id != wanted.track_id {
            return Err(InconsistentOrderingError::TrackMismatch {
                position: wanted.position,
                current: found.track_id.clone(),
                target: wanted.track_id.clone(),
            });
        }
    }

    Ok(())
}
