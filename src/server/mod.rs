//! Control API server
//!
//! Exposes the playlist manager over HTTP so playlists can be managed and
//! unmanaged while the process is running.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::manager::PlaylistManager;

pub use api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Playlist manager
    pub manager: Arc<PlaylistManager>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: ServerConfig,
}

// ============================================================================
// Control Server
// ============================================================================

/// HTTP front end for the playlist manager
pub struct ControlServer {
    config: ServerConfig,
    state: AppState,
}

impl ControlServer {
    /// Create a new control server
    pub fn new(config: ServerConfig, manager: Arc<PlaylistManager>) -> Self {
        let state = AppState {
            manager,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = create_router(self.state.clone());

        if self.config.enable_request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(format!("{addr}: {e}")))?;

        tracing::info!("Control API listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Control API shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.bind_address,
            request_logging_enabled: self.config.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Control API\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            if self.request_logging_enabled {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Error, Debug, Clone)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    BindError(String),

    /// Server error
    #[error("Server error: {0}")]
    ServeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;

    fn server(enable_request_logging: bool) -> ControlServer {
        let provider = Arc::new(InMemoryProvider::new("U1"));
        let manager = Arc::new(PlaylistManager::with_defaults(provider));
        let config = ServerConfig {
            enable_request_logging,
            ..ServerConfig::default()
        };
        ControlServer::new(config, manager)
    }

    #[test]
    fn test_server_info() {
        let info = server(false).info();
        assert_eq!(info.bind_address.port(), 8088);
        assert!(!info.request_logging_enabled);
        assert!(info.display().contains("Request Logging: disabled"));
    }

    #[tokio::test]
    async fn test_state_shares_manager() {
        let server = server(true);
        let state = server.state();
        assert!(state.manager.managed_playlists().await.is_empty());
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::BindError("127.0.0.1:1: in use".to_string());
        assert_eq!(err.to_string(), "Failed to bind: 127.0.0.1:1: in use");
    }
}
