//! Integration tests for HttpPlaylistProvider using wiremock
//!
//! These tests validate request shapes and status mapping against a mock
//! Web API.

use fairplay::config::ProviderConfig;
use fairplay::manager::{run_pass, PassOutcome};
use fairplay::models::{PlaylistItem, RelocationOp, SnapshotId};
use fairplay::provider::{HttpPlaylistProvider, PlaylistProvider, ProviderError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> HttpPlaylistProvider {
    let config = ProviderConfig {
        base_url: server.uri(),
        access_token: "test-token".to_string(),
        request_timeout_secs: 5,
        requests_per_second: 100,
    };
    HttpPlaylistProvider::new(&config).unwrap()
}

// ============================================================================
// Reads
// ============================================================================

/// Test bearer token and user lookup
#[tokio::test]
async fn test_current_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "U1" })))
        .expect(1)
        .mount(&server)
        .await;

    let user = provider(&server).current_user_id().await.unwrap();
    assert_eq!(user, "U1");
}

/// Test playlist listing keeps owners
#[tokio::test]
async fn test_user_playlists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "P1", "name": "Road trip", "owner": { "id": "U1" } },
                { "id": "P2", "name": "Shared", "owner": { "id": "U2" } }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;

    let playlists = provider(&server).user_playlists().await.unwrap();
    assert_eq!(playlists.len(), 2);
    assert_eq!(playlists[0].id, "P1");
    assert_eq!(playlists[0].owner_id, "U1");
    assert_eq!(playlists[1].owner_id, "U2");
}

/// Test track rows, including local files without ids
#[tokio::test]
async fn test_playlist_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/P1/tracks"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "added_by": { "id": "a" }, "track": { "id": "A1" } },
                { "added_by": { "id": "b" }, "track": { "id": "B1" } },
                { "added_by": null, "track": { "id": null } }
            ],
            "total": 3
        })))
        .mount(&server)
        .await;

    let items = provider(&server).playlist_items("P1").await.unwrap();
    assert_eq!(
        items,
        vec![
            PlaylistItem::new("A1", "a"),
            PlaylistItem::new("B1", "b"),
            PlaylistItem::new("", ""),
        ]
    );
}

/// Test snapshot lookup
#[tokio::test]
async fn test_snapshot_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/P1"))
        .and(query_param("fields", "snapshot_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s1" })))
        .mount(&server)
        .await;

    let snapshot = provider(&server).snapshot_id("P1").await.unwrap();
    assert_eq!(snapshot, SnapshotId::new("s1"));
}

/// Test 204 from the player means nothing is playing
#[tokio::test]
async fn test_currently_playing_idle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let playing = provider(&server).currently_playing().await.unwrap();
    assert!(playing.is_none());
}

/// Test playing track id extraction
#[tokio::test]
async fn test_currently_playing_track() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_playing": true,
            "item": { "id": "A1", "name": "Song" }
        })))
        .mount(&server)
        .await;

    let playing = provider(&server).currently_playing().await.unwrap();
    assert_eq!(playing.as_deref(), Some("A1"));
}

// ============================================================================
// Moves
// ============================================================================

/// Test moving a track up uses its target index directly
#[tokio::test]
async fn test_move_track_up() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/playlists/P1/tracks"))
        .and(body_json(json!({
            "range_start": 3,
            "insert_before": 1,
            "snapshot_id": "s1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    let next = provider(&server)
        .move_track("P1", RelocationOp::new(3, 1), &SnapshotId::new("s1"))
        .await
        .unwrap();
    assert_eq!(next, SnapshotId::new("s2"));
}

/// Test moving a track down inserts one slot past its target
#[tokio::test]
async fn test_move_track_down() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/playlists/P1/tracks"))
        .and(body_json(json!({
            "range_start": 0,
            "insert_before": 3,
            "snapshot_id": "s1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server)
        .move_track("P1", RelocationOp::new(0, 2), &SnapshotId::new("s1"))
        .await
        .unwrap();
}

// ============================================================================
// Status Mapping
// ============================================================================

/// Test 429 carries Retry-After and is not retried
#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).current_user_id().await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::RateLimited {
            retry_after_secs: Some(7)
        }
    ));
    assert!(err.is_recoverable());
}

/// Test stale snapshot maps to a conflict
#[tokio::test]
async fn test_snapshot_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/playlists/P1/tracks"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = provider(&server)
        .move_track("P1", RelocationOp::new(1, 0), &SnapshotId::new("old"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::SnapshotConflict { .. }));
}

/// Test not found and auth failures are not recoverable
#[tokio::test]
async fn test_not_found_and_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let provider = provider(&server);

    let err = provider.snapshot_id("gone").await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
    assert!(!err.is_recoverable());

    let err = provider.current_user_id().await.unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized(_)));
    assert!(!err.is_recoverable());
}

/// Test server errors surface their status
#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = provider(&server).current_user_id().await.unwrap_err();
    match err {
        ProviderError::Status { status, ref message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Full Pass
// ============================================================================

/// Test a complete pass against the mock API chains snapshots
#[tokio::test]
async fn test_full_pass_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s1" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/P1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "added_by": { "id": "a" }, "track": { "id": "A1" } },
                { "added_by": { "id": "a" }, "track": { "id": "A2" } },
                { "added_by": { "id": "a" }, "track": { "id": "A3" } },
                { "added_by": { "id": "b" }, "track": { "id": "B1" } }
            ],
            "total": 4
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item": { "id": "A1" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/playlists/P1/tracks"))
        .and(body_json(json!({
            "range_start": 3,
            "insert_before": 2,
            "snapshot_id": "s1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let outcome = run_pass(&provider, "P1", 0).await.unwrap();
    assert_eq!(
        outcome,
        PassOutcome::Completed {
            playing_index: 0,
            relocations: 1
        }
    );
}
