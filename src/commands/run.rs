use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use fairplay::config::Config;
use fairplay::manager::{ManagerEvent, PlaylistManager};
use fairplay::metrics;
use fairplay::provider::HttpPlaylistProvider;
use fairplay::server::ControlServer;

pub async fn run(config: Config, playlists: Vec<String>) -> Result<()> {
    if config.provider.access_token.is_empty() {
        anyhow::bail!("No access token configured (set FAIRPLAY_ACCESS_TOKEN or provider.access_token)");
    }

    if let Err(e) = metrics::init_metrics() {
        tracing::warn!("Failed to initialize metrics: {}", e);
    }

    let provider = Arc::new(
        HttpPlaylistProvider::new(&config.provider).context("Failed to create provider client")?,
    );
    let manager = Arc::new(PlaylistManager::new(provider, config.manager.clone()));

    spawn_event_logger(&manager);

    for playlist_id in &playlists {
        manager
            .manage(playlist_id)
            .await
            .with_context(|| format!("Failed to manage playlist {playlist_id}"))?;
    }

    let server = ControlServer::new(config.server.clone(), Arc::clone(&manager));

    println!("{}", server.info().display());
    println!();
    println!("Pass interval: {}s", config.manager.pass_interval_secs);
    println!("Managed playlists: {}", playlists.len());
    println!();
    println!("API Endpoints:");
    println!("  GET    /api/health              - Health check");
    println!("  GET    /metrics                 - Prometheus metrics endpoint");
    println!("  GET    /api/playlists           - List managed playlists");
    println!("  GET    /api/playlists/{{id}}      - Get playlist session");
    println!("  PUT    /api/playlists/{{id}}      - Start managing a playlist");
    println!("  DELETE /api/playlists/{{id}}      - Stop managing a playlist");
    println!("  POST   /api/playlists/{{id}}/pass - Run a pass now");
    println!();
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    manager.shutdown().await;

    println!("fairplay stopped.");
    Ok(())
}

/// Log manager events until the manager is dropped
fn spawn_event_logger(manager: &PlaylistManager) {
    let mut events = manager.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ManagerEvent::PassFailed { playlist_id, error }) => {
                    tracing::warn!(playlist_id = %playlist_id, error = %error, "Pass failed");
                }
                Ok(event) => {
                    tracing::debug!(event = ?event, "Manager event");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagging");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
