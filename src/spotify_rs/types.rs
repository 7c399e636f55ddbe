use serde::{Deserialize, Serialize};

/// One page of `GET /users/{owner}/playlists/{id}/tracks`, trimmed to the
/// fields requested with `fields=items(track(id)),next`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    /// `null` when the track was removed from the catalog.
    #[serde(default)]
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemTrack {
    /// `null` for local files.
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of `POST /users/{owner}/playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Body of `DELETE /users/{owner}/playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

/// Returned by both mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub snapshot_id: Option<String>,
}
