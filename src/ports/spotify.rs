use std::collections::HashSet;
use std::fmt;

use crate::error::Result;

/// A Spotify track id, e.g. `4uLU6hMCjMI75M1A2tKUQC`. Compared as plain strings.
pub type TrackId = String;

/// The tracks of a playlist with order and duplicates thrown away.
pub type TrackSet = HashSet<TrackId>;

/// A playlist, named by the user who owns it and its Spotify id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistRef {
    pub owner: String,
    pub id: String,
}

impl PlaylistRef {
    pub fn new(owner: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.id)
    }
}

/// Port trait wrapping the Spotify playlist endpoints the reconciler needs.
///
/// Implementations live in `services::spotify::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpotifyClient: Send + Sync {
    /// Every track id in the playlist, in playlist order, across all pages.
    async fn playlist_track_ids(&self, playlist: &PlaylistRef) -> Result<Vec<TrackId>>;

    /// Appends the tracks. Callers keep `track_ids` within [`SpotifyClient::batch_limit`].
    async fn add_tracks(&self, playlist: &PlaylistRef, track_ids: &[TrackId]) -> Result<()>;

    /// Removes every occurrence of the tracks. Same size limit as `add_tracks`.
    async fn remove_tracks(&self, playlist: &PlaylistRef, track_ids: &[TrackId]) -> Result<()>;

    /// Most track ids a single add or remove request may carry.
    fn batch_limit(&self) -> usize;
}
