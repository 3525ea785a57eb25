//! REST API handlers for the control server

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::manager::{ManagerError, PassOutcome, PlaylistSession};
use crate::metrics;

use super::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub managed_playlists: usize,
}

/// Result of a manage request
#[derive(Debug, Serialize)]
pub struct ManageResponse {
    pub playlist_id: String,
    /// False when the playlist was already managed
    pub newly_managed: bool,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/playlists", get(list_playlists))
        .route(
            "/api/playlists/{id}",
            get(get_playlist)
                .put(manage_playlist)
                .delete(unmanage_playlist),
        )
        .route("/api/playlists/{id}/pass", post(run_pass_now))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Map a manager error onto an HTTP status
fn error_status(err: &ManagerError) -> StatusCode {
    match err {
        ManagerError::PlaylistDoesNotBelongToUser { .. } => StatusCode::FORBIDDEN,
        ManagerError::NotManaged(_) => StatusCode::NOT_FOUND,
        ManagerError::Provider(_) => StatusCode::BAD_GATEWAY,
        ManagerError::Ordering(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ManagerError) -> Response {
    (error_status(&err), Json(ErrorResponse::new(err.to_string()))).into_response()
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let managed = state.manager.managed_playlists().await.len();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        managed_playlists: managed,
    }))
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to encode metrics: {e}"))),
        )
            .into_response(),
    }
}

// ============================================================================
// Playlist Handlers
// ============================================================================

/// List managed playlists with their sessions
async fn list_playlists(State(state): State<AppState>) -> impl IntoResponse {
    let sessions: Vec<PlaylistSession> = state.manager.sessions().await;
    Json(ApiResponse::success(sessions))
}

/// Get the session of one managed playlist
async fn get_playlist(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.manager.session(&id).await {
        Some(session) => (StatusCode::OK, Json(ApiResponse::success(session))).into_response(),
        None => error_response(ManagerError::NotManaged(id)),
    }
}

/// Start managing a playlist
async fn manage_playlist(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.manager.manage(&id).await {
        Ok(newly_managed) => {
            let status = if newly_managed {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(ApiResponse::success(ManageResponse {
                    playlist_id: id,
                    newly_managed,
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Stop managing a playlist
async fn unmanage_playlist(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.manager.unmanage(&id).await {
        (
            StatusCode::OK,
            Json(ApiResponse::success(format!("Playlist {id} unmanaged"))),
        )
            .into_response()
    } else {
        error_response(ManagerError::NotManaged(id))
    }
}

/// Run a pass immediately
async fn run_pass_now(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.manager.run_now(&id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::<PassOutcome>::success(outcome)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Tests
// ============================================================================
