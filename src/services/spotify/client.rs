use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::ports::spotify::{PlaylistRef, SpotifyClient, TrackId};
use crate::spotify_rs::AccessToken;
use crate::spotify_rs::playlist::{
    MAX_ITEMS_PER_REQUEST, add_tracks_to_playlist, get_playlist_track_ids,
    remove_tracks_from_playlist,
};

/// Everything a request needs, built once in `main` and handed down.
#[derive(Debug, Clone)]
pub struct SpotifyApiSettings {
    pub base_url: Url,
    pub access_token: AccessToken,
    pub timeout: Duration,
    pub batch_limit: usize,
}

pub struct SpotifyHttpAdapter {
    client: Client,
    base_url: Url,
    access_token: AccessToken,
    batch_limit: usize,
}

impl SpotifyHttpAdapter {
    pub fn new(settings: SpotifyApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|error| Error::transport("building the HTTP client", error))?;

        Ok(Self {
            client,
            base_url: settings.base_url,
            access_token: settings.access_token,
            batch_limit: settings.batch_limit.clamp(1, MAX_ITEMS_PER_REQUEST),
        })
    }
}

#[async_trait::async_trait]
impl SpotifyClient for SpotifyHttpAdapter {
    async fn playlist_track_ids(&self, playlist: &PlaylistRef) -> Result<Vec<TrackId>> {
        get_playlist_track_ids(
            &self.client,
            &self.base_url,
            self.access_token.secret(),
            playlist,
        )
        .await
    }

    async fn add_tracks(&self, playlist: &PlaylistRef, track_ids: &[TrackId]) -> Result<()> {
        add_tracks_to_playlist(
            &self.client,
            &self.base_url,
            self.access_token.secret(),
            playlist,
            track_ids,
        )
        .await
    }

    async fn remove_tracks(&self, playlist: &PlaylistRef, track_ids: &[TrackId]) -> Result<()> {
        remove_tracks_from_playlist(
            &self.client,
            &self.base_url,
            self.access_token.secret(),
            playlist,
            track_ids,
        )
        .await
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}
