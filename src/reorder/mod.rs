//! Fair reordering and permutation diffing
//!
//! This module holds the pure, synchronous core of a reorder pass.
//!
//! # Overview
//!
//! A pass turns a playlist snapshot into a list of single-track moves:
//!
//! ```text
//!   current ordering ──┬── played prefix (0..=playing) ───────────┐
//!                      │                                          ├── target ordering
//!                      └── unplayed suffix ── compute_fair_order ─┘
//!
//!   compute_relocations(current, target) ──► [RelocationOp, ...]
//! ```
//!
//! # Modules
//!
//! - [`fair`] - Round-robin interleaving of contributors
//! - [`diff`] - Left-to-right selection-by-relocation diff
//! - [`plan`] - Playback boundary lookup and full target assembly
//! - [`error`] - Ordering contract violations
//!
//! Everything here is a plain function over owned or borrowed values, so it
//! can run for many playlists at once without coordination.

pub mod diff;
pub mod error;
pub mod fair;
pub mod plan;

pub use diff::{apply_relocations, compute_relocations};
pub use error::{InconsistentOrderingError, OrderingError, OrderingResult};
pub use fair::{compute_fair_order, ContributorQueues};
pub use plan::{locate_playing_index, ReorderPlan};
