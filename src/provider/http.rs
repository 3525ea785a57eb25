//! Spotify-shaped Web API provider
//!
//! This module provides [`HttpPlaylistProvider`], a reqwest client for the
//! handful of endpoints a reorder pass needs:
//! - Bearer token authentication (static token from config)
//! - Request pacing with governor
//! - Status code mapping to [`ProviderError`]
//!
//! Requests are never retried here. A failed pass is abandoned and the next
//! scheduled tick starts over from a fresh snapshot.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::models::{PlaylistItem, PlaylistSummary, RelocationOp, SnapshotId};

use super::{PlaylistProvider, ProviderError, ProviderResult};

/// Page size for playlist listings
const PLAYLISTS_PAGE_LIMIT: u32 = 50;

/// Page size for playlist tracks
const TRACKS_PAGE_LIMIT: u32 = 100;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct UserObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistsPage {
    items: Vec<PlaylistObject>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    id: String,
    owner: UserObject,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    items: Vec<TrackRow>,
    #[serde(default)]
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TrackRow {
    added_by: Option<UserObject>,
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    snapshot_id: String,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlayingResponse {
    item: Option<TrackObject>,
}

#[derive(Debug, Serialize)]
struct ReorderRequest<'a> {
    range_start: usize,
    insert_before: usize,
    snapshot_id: &'a str,
}

impl From<TrackRow> for PlaylistItem {
    fn from(row: TrackRow) -> Self {
        Self {
            track_id: row.track.and_then(|t| t.id).unwrap_or_default(),
            added_by: row.added_by.map(|u| u.id).unwrap_or_default(),
        }
    }
}

// ============================================================================
// HTTP Provider
// ============================================================================

/// Playlist provider backed by the Spotify Web API
pub struct HttpPlaylistProvider {
    client: Client,
    base_url: String,
    access_token: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpPlaylistProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be created
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("fairplay/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    /// Translate a relocation into the API's `insert_before` index
    ///
    /// The API inserts before the given index of the pre-move list, so moving
    /// an element down needs one extra slot to land at `to`.
    pub fn insert_before(op: RelocationOp) -> usize {
        if op.to > op.from {
            op.to + 1
        } else {
            op.to
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        self.rate_limiter.until_ready().await;
        let response = request.bearer_auth(&self.access_token).send().await?;
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> ProviderResult<T> {
        let response = self.send(request).await?;
        let response = Self::check_status(response, resource).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{resource}: {e}")))
    }

    async fn check_status(response: Response, resource: &str) -> ProviderResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let message = response.text().await.unwrap_or_default();

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::Unauthorized(format!("{resource}: {message}"))
            }
            StatusCode::NOT_FOUND => ProviderError::NotFound(resource.to_string()),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                ProviderError::SnapshotConflict {
                    playlist_id: resource.to_string(),
                }
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { retry_after_secs },
            _ => ProviderError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait::async_trait]
impl PlaylistProvider for HttpPlaylistProvider {
    async fn current_user_id(&self) -> ProviderResult<String> {
        let me: UserObject = self
            .send_json(self.client.get(self.url("/v1/me")), "me")
            .await?;
        Ok(me.id)
    }

    async fn user_playlists(&self) -> ProviderResult<Vec<PlaylistSummary>> {
        let request = self
            .client
            .get(self.url("/v1/me/playlists"))
            .query(&[("limit", PLAYLISTS_PAGE_LIMIT)]);
        let page: PlaylistsPage = self.send_json(request, "me/playlists").await?;

        Ok(page
            .items
            .into_iter()
            .map(|p| PlaylistSummary {
                id: p.id,
                owner_id: p.owner.id,
            })
            .collect())
    }

    async fn playlist_items(&self, playlist_id: &str) -> ProviderResult<Vec<PlaylistItem>> {
        let limit = TRACKS_PAGE_LIMIT.to_string();
        let request = self
            .client
            .get(self.url(&format!("/v1/playlists/{playlist_id}/tracks")))
            .query(&[
                ("fields", "items(added_by.id,track.id),total"),
                ("limit", limit.as_str()),
            ]);
        let page: TracksPage = self.send_json(request, playlist_id).await?;

        if let Some(total) = page.total.filter(|&t| t > page.items.len()) {
            tracing::warn!(
                playlist_id = %playlist_id,
                total,
                fetched = page.items.len(),
                "Playlist longer than one page; only the first page is reordered"
            );
        }

        Ok(page.items.into_iter().map(PlaylistItem::from).collect())
    }

    async fn snapshot_id(&self, playlist_id: &str) -> ProviderResult<SnapshotId> {
        let request = self
            .client
            .get(self.url(&format!("/v1/playlists/{playlist_id}")))
            .query(&[("fields", "snapshot_id")]);
        let response: SnapshotResponse = self.send_json(request, playlist_id).await?;
        Ok(SnapshotId(response.snapshot_id))
    }

    async fn currently_playing(&self) -> ProviderResult<Option<String>> {
        let request = self.client.get(self.url("/v1/me/player/currently-playing"));
        let response = self.send(request).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check_status(response, "me/player").await?;
        let playing: CurrentlyPlayingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("me/player: {e}")))?;

        Ok(playing.item.and_then(|t| t.id))
    }

    async fn move_track(
        &self,
        playlist_id: &str,
        op: RelocationOp,
        snapshot: &SnapshotId,
    ) -> ProviderResult<SnapshotId> {
        let body = ReorderRequest {
            range_start: op.from,
            insert_before: Self::insert_before(op),
            snapshot_id: snapshot.as_str(),
        };
        let request = self
            .client
            .put(self.url(&format!("/v1/playlists/{playlist_id}/tracks")))
            .json(&body);
        let response: SnapshotResponse = self.send_json(request, playlist_id).await?;

        tracing::debug!(
            playlist_id = %playlist_id,
            from = op.from,
            to = op.to,
            snapshot = %response.snapshot_id,
            "Track moved"
        );

        Ok(SnapshotId(response.snapshot_id))
    }
}
