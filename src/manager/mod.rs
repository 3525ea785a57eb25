//! Managed playlist lifecycle
//!
//! The [`PlaylistManager`] owns one background task per managed playlist.
//! Each task wakes on a fixed interval and runs a reorder pass.
//!
//! # Lifecycle
//!
//! ```text
//!   manage(id) ──► ownership check ──► spawn schedule task ──► Managed
//!                        │
//!                        └── not owned ──► PlaylistDoesNotBelongToUser (nothing spawned)
//!
//!   schedule task:  tick ──► run_pass ──► record outcome ──► tick ...
//!
//!   unmanage(id) ──► stop signal ──► current pass finishes, no further ticks
//! ```
//!
//! Passes of one playlist never overlap: the schedule task awaits each pass
//! before waiting for the next tick, and [`PlaylistManager::run_now`] takes
//! the same per-playlist pass lock. The lock belongs to the playlist id, not
//! to one schedule, so a playlist unmanaged and managed again mid-pass waits
//! for the old pass. Passes of different playlists run independently.
//!
//! # Modules
//!
//! - [`pass`] - One reorder pass against the provider
//! - [`session`] - Per-playlist state threaded between passes
//! - [`error`] - Manager error types

pub mod error;
pub mod pass;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ManagerConfig;
use crate::metrics;
use crate::provider::PlaylistProvider;

pub use error::{ManagerError, ManagerResult};
pub use pass::{run_pass, PassOutcome, SkipReason};
pub use session::PlaylistSession;

// ============================================================================
// Manager Events
// ============================================================================

/// Events emitted by the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ManagerEvent {
    /// A playlist is now managed
    Managed { playlist_id: String },

    /// A playlist is no longer managed
    Unmanaged { playlist_id: String },

    /// A pass ran the reorder engines
    PassCompleted {
        playlist_id: String,
        playing_index: usize,
        relocations: usize,
    },

    /// A pass found no playback boundary
    PassSkipped {
        playlist_id: String,
        reason: SkipReason,
    },

    /// A pass was abandoned on error
    PassFailed { playlist_id: String, error: String },
}

// ============================================================================
// Schedule Task
// ============================================================================

/// Everything a schedule task needs for one playlist
#[derive(Clone)]
struct PlaylistWorker {
    playlist_id: String,
    provider: Arc<dyn PlaylistProvider>,
    session: Arc<RwLock<PlaylistSession>>,
    pass_lock: Arc<Mutex<()>>,
    events: broadcast::Sender<ManagerEvent>,
}

impl PlaylistWorker {
    /// Run one pass and fold its result into the session
    async fn run_once(&self) -> ManagerResult<PassOutcome> {
        let _guard = self.pass_lock.lock().await;
        let hint = self.session.read().await.last_playing_index;

        match run_pass(self.provider.as_ref(), &self.playlist_id, hint).await {
            Ok(outcome) => {
                self.session.write().await.record_outcome(&outcome);
                let event = match &outcome {
                    PassOutcome::Completed {
                        playing_index,
                        relocations,
                    } => ManagerEvent::PassCompleted {
                        playlist_id: self.playlist_id.clone(),
                        playing_index: *playing_index,
                        relocations: *relocations,
                    },
                    PassOutcome::Skipped { reason } => ManagerEvent::PassSkipped {
                        playlist_id: self.playlist_id.clone(),
                        reason: reason.clone(),
                    },
                };
                let _ = self.events.send(event);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    playlist_id = %self.playlist_id,
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "Reorder pass failed"
                );
                self.session.write().await.record_failure(e.to_string());
                let _ = self.events.send(ManagerEvent::PassFailed {
                    playlist_id: self.playlist_id.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Tick until the stop signal fires or its sender is dropped
    async fn run_schedule(
        self,
        period: Duration,
        trigger_on_start: bool,
        mut stop: watch::Receiver<bool>,
    ) {
        let start = if trigger_on_start {
            Instant::now()
        } else {
            Instant::now() + period
        };
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                _ = ticker.tick() => {}
            }

            if *stop.borrow() {
                break;
            }

            // Errors are already logged and recorded; the schedule carries on.
            let _ = self.run_once().await;
        }

        tracing::debug!(playlist_id = %self.playlist_id, "Schedule stopped");
    }
}

/// Handle to a running schedule task
struct ManagedPlaylist {
    worker: PlaylistWorker,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

// ============================================================================
// Playlist Manager
// ============================================================================

/// Keeps a set of playlists in fair order
pub struct PlaylistManager {
    provider: Arc<dyn PlaylistProvider>,
    config: ManagerConfig,
    playlists: RwLock<HashMap<String, ManagedPlaylist>>,
    /// Outlives unmanage so a later schedule queues behind an old pass
    pass_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    event_sender: broadcast::Sender<ManagerEvent>,
}

impl PlaylistManager {
    /// Create a new manager
    pub fn new(provider: Arc<dyn PlaylistProvider>, config: ManagerConfig) -> Self {
        let (event_sender, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            provider,
            config,
            playlists: RwLock::new(HashMap::new()),
            pass_locks: Mutex::new(HashMap::new()),
            event_sender,
        }
    }

    /// Create with default config
    pub fn with_defaults(provider: Arc<dyn PlaylistProvider>) -> Self {
        Self::new(provider, ManagerConfig::default())
    }

    /// Subscribe to manager events
    pub fn subscribe(&self) -> broadcast::Receiver<ManagerEvent> {
        self.event_sender.subscribe()
    }

    /// Start managing a playlist owned by the authenticated user
    ///
    /// Returns `Ok(false)` if the playlist was already managed.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::PlaylistDoesNotBelongToUser` if the playlist is
    /// missing or owned by another user. No schedule is started in that case.
    pub async fn manage(&self, playlist_id: &str) -> ManagerResult<bool> {
        self.verify_ownership(playlist_id).await?;

        let mut playlists = self.playlists.write().await;
        if playlists.contains_key(playlist_id) {
            tracing::debug!(playlist_id = %playlist_id, "Playlist already managed");
            return Ok(false);
        }

        let worker = PlaylistWorker {
            playlist_id: playlist_id.to_string(),
            provider: Arc::clone(&self.provider),
            session: Arc::new(RwLock::new(PlaylistSession::new(playlist_id))),
            pass_lock: self.pass_lock(playlist_id).await,
            events: self.event_sender.clone(),
        };

        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(worker.clone().run_schedule(
            self.config.pass_interval(),
            self.config.trigger_on_start,
            stop_rx,
        ));

        playlists.insert(
            playlist_id.to_string(),
            ManagedPlaylist { worker, stop, task },
        );
        metrics::set_managed_playlists(playlists.len());

        tracing::info!(
            playlist_id = %playlist_id,
            interval_secs = self.config.pass_interval_secs,
            "Playlist managed"
        );
        let _ = self.event_sender.send(ManagerEvent::Managed {
            playlist_id: playlist_id.to_string(),
        });

        Ok(true)
    }

    /// Stop managing a playlist
    ///
    /// A pass already in flight is allowed to finish. Returns `false` if the
    /// playlist was not managed.
    pub async fn unmanage(&self, playlist_id: &str) -> bool {
        let mut playlists = self.playlists.write().await;
        let Some(managed) = playlists.remove(playlist_id) else {
            return false;
        };
        metrics::set_managed_playlists(playlists.len());
        drop(playlists);

        let _ = managed.stop.send(true);

        tracing::info!(playlist_id = %playlist_id, "Playlist unmanaged");
        let _ = self.event_sender.send(ManagerEvent::Unmanaged {
            playlist_id: playlist_id.to_string(),
        });

        true
    }

    /// Run a pass immediately, serialized with scheduled passes
    pub async fn run_now(&self, playlist_id: &str) -> ManagerResult<PassOutcome> {
        let worker = self
            .playlists
            .read()
            .await
            .get(playlist_id)
            .map(|m| m.worker.clone())
            .ok_or_else(|| ManagerError::NotManaged(playlist_id.to_string()))?;

        worker.run_once().await
    }

    /// Check if a playlist is managed
    pub async fn is_managed(&self, playlist_id: &str) -> bool {
        self.playlists.read().await.contains_key(playlist_id)
    }

    /// Identifiers of all managed playlists, sorted
    pub async fn managed_playlists(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.playlists.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Session snapshot for one playlist
    pub async fn session(&self, playlist_id: &str) -> Option<PlaylistSession> {
        let session = self
            .playlists
            .read()
            .await
            .get(playlist_id)
            .map(|m| Arc::clone(&m.worker.session))?;
        let snapshot = session.read().await.clone();
        Some(snapshot)
    }

    /// Session snapshots for all managed playlists, sorted by id
    pub async fn sessions(&self) -> Vec<PlaylistSession> {
        let handles: Vec<Arc<RwLock<PlaylistSession>>> = self
            .playlists
            .read()
            .await
            .values()
            .map(|m| Arc::clone(&m.worker.session))
            .collect();

        let mut sessions = Vec::with_capacity(handles.len());
        for handle in handles {
            sessions.push(handle.read().await.clone());
        }
        sessions.sort_by(|a, b| a.playlist_id.cmp(&b.playlist_id));
        sessions
    }

    /// Stop every schedule and wait for in-flight passes to finish
    pub async fn shutdown(&self) {
        let drained: Vec<(String, ManagedPlaylist)> =
            self.playlists.write().await.drain().collect();
        metrics::set_managed_playlists(0);

        for (_, managed) in &drained {
            let _ = managed.stop.send(true);
        }

        for (playlist_id, managed) in drained {
            if let Err(e) = managed.task.await {
                tracing::warn!(playlist_id = %playlist_id, error = %e, "Schedule task ended abnormally");
            }
            let _ = self.event_sender.send(ManagerEvent::Unmanaged { playlist_id });
        }

        tracing::info!("Playlist manager shut down");
    }

    /// Pass lock for a playlist id, created on first use
    async fn pass_lock(&self, playlist_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.pass_locks.lock().await;
        Arc::clone(
            locks
                .entry(playlist_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    async fn verify_ownership(&self, playlist_id: &str) -> ManagerResult<()> {
        let user_id = self.provider.current_user_id().await?;
        let playlists = self.provider.user_playlists().await?;

        let owned = playlists
            .iter()
            .any(|p| p.id == playlist_id && p.owner_id == user_id);

        if !owned {
            tracing::warn!(
                playlist_id = %playlist_id,
                user_id = %user_id,
                "Refusing to manage playlist not owned by user"
            );
            return Err(ManagerError::not_owned(playlist_id, user_id));
        }

        Ok(())
    }
}
