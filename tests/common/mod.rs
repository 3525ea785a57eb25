//! Common test utilities

use fairplay::models::{Ordering, PlaylistItem};
use fairplay::provider::InMemoryProvider;

/// Build playlist rows from `(track_id, added_by)` pairs
pub fn items(rows: &[(&str, &str)]) -> Vec<PlaylistItem> {
    rows.iter()
        .map(|(track, user)| PlaylistItem::new(*track, *user))
        .collect()
}

/// Identity-tagged ordering from `(track_id, added_by)` pairs
#[allow(dead_code)]
pub fn ordering(rows: &[(&str, &str)]) -> Ordering {
    Ordering::from_items(&items(rows))
}

/// In-memory provider authenticated as `U1` owning playlist `P1`
#[allow(dead_code)]
pub fn provider_with(rows: &[(&str, &str)]) -> InMemoryProvider {
    InMemoryProvider::new("U1").with_playlist("P1", "U1", items(rows))
}
