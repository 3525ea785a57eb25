//! Round-robin interleaving of contributors
//!
//! Tracks are grouped into one FIFO queue per contributor, in the order each
//! contributor first appears. The merge then takes one track from every
//! non-empty queue per round until all queues drain.

use std::collections::{HashMap, VecDeque};

use crate::models::{Ordering, TrackEntry};

// ============================================================================
// Contributor Queues
// ============================================================================

/// Per-contributor FIFO queues in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct ContributorQueues {
    queues: Vec<(String, VecDeque<TrackEntry>)>,
    index: HashMap<String, usize>,
}

impl ContributorQueues {
    /// Create an empty set of queues
    pub fn new() -> Self {
        Self::default()
    }

    /// Group entries by contributor, keeping each contributor's order
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = TrackEntry>,
    {
        let mut queues = Self::new();
        for entry in entries {
            queues.push(entry);
        }
        queues
    }

    /// Append an entry to its contributor's queue
    pub fn push(&mut self, entry: TrackEntry) {
        let slot = match self.index.get(&entry.contributor_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.queues.len();
                self.index.insert(entry.contributor_id.clone(), slot);
                self.queues
                    .push((entry.contributor_id.clone(), VecDeque::new()));
                slot
            }
        };
        self.queues[slot].1.push_back(entry);
    }

    /// Contributors in order of first appearance
    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        self.queues.iter().map(|(id, _)| id.as_str())
    }

    /// Queued entries for one contributor
    pub fn queue(&self, contributor_id: &str) -> Option<&VecDeque<TrackEntry>> {
        self.index
            .get(contributor_id)
            .map(|&slot| &self.queues[slot].1)
    }

    /// Number of contributors
    pub fn contributor_count(&self) -> usize {
        self.queues.len()
    }

    /// Total number of queued entries
    pub fn len(&self) -> usize {
        self.queues.iter().map(|(_, q)| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the queues one track per contributor per round
    pub fn into_round_robin(self) -> Ordering {
        let mut merged = Vec::with_capacity(self.len());
        let mut remaining: Vec<VecDeque<TrackEntry>> =
            self.queues.into_iter().map(|(_, q)| q).collect();

        while !remaining.is_empty() {
            remaining.retain_mut(|queue| {
                if let Some(entry) = queue.pop_front() {
                    merged.push(entry);
                }
                !queue.is_empty()
            });
        }

        Ordering::new(merged)
    }
}

/// Compute the fair order for the unplayed suffix of a playlist
///
/// Entries keep their position tags, so the result can be fed straight to
/// [`compute_relocations`](super::diff::compute_relocations) as part of a
/// target ordering.
pub fn compute_fair_order(unplayed: &Ordering) -> Ordering {
    ContributorQueues::from_entries(unplayed.iter().cloned()).into_round_robin()
}
