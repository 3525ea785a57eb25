//! fairplay - Fair round-robin ordering for collaborative playlists
//!
//! Keeps the unplayed part of a shared playlist interleaved so that every
//! contributor gets a turn before anyone gets a second one.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Playlist rows, orderings and relocation operations
//! - [`reorder`] - Fair-order engine and relocation diff engine
//! - [`provider`] - Remote playlist service abstraction (HTTP and in-memory)
//! - [`manager`] - Per-playlist background passes
//! - [`server`] - Control API
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fairplay::config::Config;
//! use fairplay::manager::PlaylistManager;
//! use fairplay::provider::HttpPlaylistProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let provider = Arc::new(HttpPlaylistProvider::new(&config.provider)?);
//!     let manager = PlaylistManager::new(provider, config.manager.clone());
//!     manager.manage("37i9dQZF1DXcBWIGoYBM5M").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod models;
pub mod provider;
pub mod reorder;
pub mod server;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, FairplayErrorTrait, Result};
    pub use crate::manager::{ManagerEvent, PassOutcome, PlaylistManager, PlaylistSession};
    pub use crate::models::{Ordering, PlaylistItem, RelocationOp, SnapshotId, TrackEntry};
    pub use crate::provider::{HttpPlaylistProvider, InMemoryProvider, PlaylistProvider};
    pub use crate::reorder::{compute_fair_order, compute_relocations, ReorderPlan};
    pub use crate::server::ControlServer;
}

// Direct re-exports for convenience
pub use models::{Ordering, PlaylistItem, RelocationOp, TrackEntry};
