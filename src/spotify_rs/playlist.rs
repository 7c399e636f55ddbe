use futures::{Stream, TryStreamExt, stream};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::error::{Error, Result};
use crate::ports::spotify::{PlaylistRef, TrackId};
use crate::spotify_rs::types::{
    AddTracksRequest, PlaylistTracksPage, RemoveTracksRequest, SnapshotResponse, TrackUri,
};

pub const TRACK_URI_PREFIX: &str = "spotify:track:";

/// Spotify accepts at most this many tracks per add or remove request, and
/// returns at most this many per page.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

// Only the track ids and the cursor are needed.
const TRACK_FIELDS: &str = "items(track(id)),next";

pub fn track_uri(track_id: &str) -> String {
    format!("{TRACK_URI_PREFIX}{track_id}")
}

pub fn playlist_tracks_url(base_url: &Url, playlist: &PlaylistRef) -> Result<Url> {
    base_url
        .join(&format!(
            "users/{}/playlists/{}/tracks",
            urlencoding::encode(&playlist.owner),
            urlencoding::encode(&playlist.id)
        ))
        .map_err(|error| Error::transport(format!("building the tracks URL of {playlist}"), error))
}

/// The listing is finished when `next` is missing, empty, or the string `"null"`.
pub fn next_cursor(next: Option<String>) -> Option<String> {
    next.filter(|url| !url.is_empty() && url != "null")
}

/// Maps a non-success response to an error, reading the body for the message.
async fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error text".to_string());

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::auth(format!(
            "Spotify rejected the access token while {context}: {body}"
        )));
    }

    Err(Error::transport(context, format!("HTTP {status}: {body}")))
}

/* ---------- Listing ---------- */

/// Lazily walks the pages of a playlist's tracks, one request per page.
///
/// Each item is the track ids of one page, in playlist order. Entries without
/// a track or without an id (removed tracks, local files) are skipped. The
/// stream ends when the cursor runs out; call again to start over from the
/// first page.
pub fn playlist_track_pages(
    client: &Client,
    base_url: &Url,
    access_token: &str,
    playlist: &PlaylistRef,
) -> Result<impl Stream<Item = Result<Vec<TrackId>>> + use<>> {
    let mut first_page = playlist_tracks_url(base_url, playlist)?;
    first_page
        .query_pairs_mut()
        .append_pair("fields", TRACK_FIELDS)
        .append_pair("limit", &MAX_ITEMS_PER_REQUEST.to_string());

    let client = client.clone();
    let access_token = access_token.to_string();
    let context = format!("listing the tracks of {playlist}");

    Ok(stream::try_unfold(Some(first_page), move |cursor| {
        let client = client.clone();
        let access_token = access_token.clone();
        let context = context.clone();
        async move {
            match cursor {
                None => Ok(None),
                Some(url) => fetch_tracks_page(&client, url, &access_token, &context)
                    .await
                    .map(Some),
            }
        }
    }))
}

async fn fetch_tracks_page(
    client: &Client,
    url: Url,
    access_token: &str,
    context: &str,
) -> Result<(Vec<TrackId>, Option<Url>)> {
    let response = client
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|error| Error::transport(context, error))?;

    let page: PlaylistTracksPage = check_status(response, context)
        .await?
        .json()
        .await
        .map_err(|error| Error::transport(context, error))?;

    let track_ids = page
        .items
        .into_iter()
        .filter_map(|item| item.track?.id)
        .filter(|id| !id.is_empty())
        .collect();

    let next = match next_cursor(page.next) {
        Some(next) => Some(Url::parse(&next).map_err(|error| Error::transport(context, error))?),
        None => None,
    };

    Ok((track_ids, next))
}

/// Every track id of the playlist, following the cursor to the last page.
pub async fn get_playlist_track_ids(
    client: &Client,
    base_url: &Url,
    access_token: &str,
    playlist: &PlaylistRef,
) -> Result<Vec<TrackId>> {
    log::info!("Getting track listing for playlist {playlist}");

    let track_ids: Vec<TrackId> = playlist_track_pages(client, base_url, access_token, playlist)?
        .inspect_ok(|page| log::debug!("Fetched {} tracks of {playlist}", page.len()))
        .try_concat()
        .await?;

    log::info!("{} tracks in playlist {playlist}", track_ids.len());
    Ok(track_ids)
}

/* ---------- Add and remove ---------- */

pub async fn add_tracks_to_playlist(
    client: &Client,
    base_url: &Url,
    access_token: &str,
    playlist: &PlaylistRef,
    track_ids: &[TrackId],
) -> Result<()> {
    if track_ids.is_empty() {
        return Ok(());
    }

    let url = playlist_tracks_url(base_url, playlist)?;
    let context = format!("adding {} tracks to {playlist}", track_ids.len());
    let body = AddTracksRequest {
        uris: track_ids.iter().map(|id| track_uri(id)).collect(),
    };

    let response = client
        .post(url)
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await
        .map_err(|error| Error::transport(context.as_str(), error))?;

    log_snapshot(check_status(response, &context).await?, &context).await;
    Ok(())
}

pub async fn remove_tracks_from_playlist(
    client: &Client,
    base_url: &Url,
    access_token: &str,
    playlist: &PlaylistRef,
    track_ids: &[TrackId],
) -> Result<()> {
    if track_ids.is_empty() {
        return Ok(());
    }

    let url = playlist_tracks_url(base_url, playlist)?;
    let context = format!("removing {} tracks from {playlist}", track_ids.len());
    let body = RemoveTracksRequest {
        tracks: track_ids
            .iter()
            .map(|id| TrackUri { uri: track_uri(id) })
            .collect(),
    };

    let response = client
        .delete(url)
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await
        .map_err(|error| Error::transport(context.as_str(), error))?;

    log_snapshot(check_status(response, &context).await?, &context).await;
    Ok(())
}

async fn log_snapshot(response: Response, context: &str) {
    let status = response.status();
    match response.json::<SnapshotResponse>().await {
        Ok(SnapshotResponse {
            snapshot_id: Some(snapshot_id),
        }) => log::debug!("Done {context}: HTTP {status}, snapshot {snapshot_id}"),
        _ => log::debug!("Done {context}: HTTP {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/v1/", server.uri())).unwrap()
    }

    fn playlist() -> PlaylistRef {
        PlaylistRef::new("owner", "pl1")
    }

    #[test]
    fn test_next_cursor() {
        assert_eq!(next_cursor(None), None);
        assert_eq!(next_cursor(Some(String::new())), None);
        assert_eq!(next_cursor(Some("null".into())), None);
        assert_eq!(
            next_cursor(Some("https://api.spotify.com/v1/next".into())),
            Some("https://api.spotify.com/v1/next".into())
        );
    }

    #[test]
    fn test_playlist_tracks_url_encodes_owner() {
        let base = Url::parse("https://api.spotify.com/v1/").unwrap();
        let url = playlist_tracks_url(&base, &PlaylistRef::new("some user", "abc")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.spotify.com/v1/users/some%20user/playlists/abc/tracks"
        );
    }

    #[tokio::test]
    async fn test_get_playlist_track_ids_follows_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/owner/playlists/pl1/tracks"))
            .and(query_param("fields", TRACK_FIELDS))
            .and(bearer_token("token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"track": {"id": "t1"}},
                    {"track": null},
                    {"track": {"id": null}},
                    {"track": {"id": "t2"}}
                ],
                "next": format!("{}/v1/page-two", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/page-two"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"track": {"id": "t3"}}, {"track": {"id": "t1"}}],
                "next": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = get_playlist_track_ids(&Client::new(), &base_url(&server), "token", &playlist())
            .await
            .unwrap();

        assert_eq!(ids, vec!["t1", "t2", "t3", "t1"]);
    }

    #[tokio::test]
    async fn test_get_playlist_track_ids_stops_on_null_string_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/owner/playlists/pl1/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"track": {"id": "t1"}}],
                "next": "null"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ids = get_playlist_track_ids(&Client::new(), &base_url(&server), "token", &playlist())
            .await
            .unwrap();

        assert_eq!(ids, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_track_pages_can_be_restarted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/owner/playlists/pl1/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"track": {"id": "t1"}}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = Client::new();
        for _ in 0..2 {
            let pages: Vec<Vec<TrackId>> =
                playlist_track_pages(&client, &base_url(&server), "token", &playlist())
                    .unwrap()
                    .try_collect()
                    .await
                    .unwrap();
            assert_eq!(pages, vec![vec!["t1".to_string()]]);
        }
    }

    #[tokio::test]
    async fn test_listing_error_status_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let result =
            get_playlist_track_ids(&Client::new(), &base_url(&server), "token", &playlist()).await;

        match result {
            Err(Error::Transport { context, source }) => {
                assert!(context.contains("owner/pl1"));
                assert!(source.to_string().contains("404"));
            }
            other => panic!("expected a transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("The access token expired"))
            .mount(&server)
            .await;

        let result =
            get_playlist_track_ids(&Client::new(), &base_url(&server), "token", &playlist()).await;

        assert!(matches!(result, Err(Error::Auth { .. })));
    }

    #[tokio::test]
    async fn test_add_tracks_posts_uris() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/users/owner/playlists/pl1/tracks"))
            .and(bearer_token("token"))
            .and(body_json(json!({
                "uris": ["spotify:track:t1", "spotify:track:t2"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "s1"})))
            .expect(1)
            .mount(&server)
            .await;

        add_tracks_to_playlist(
            &Client::new(),
            &base_url(&server),
            "token",
            &playlist(),
            &["t1".to_string(), "t2".to_string()],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_remove_tracks_deletes_uris() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/users/owner/playlists/pl1/tracks"))
            .and(body_json(json!({
                "tracks": [{"uri": "spotify:track:t9"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"snapshot_id": "s2"})))
            .expect(1)
            .mount(&server)
            .await;

        remove_tracks_from_playlist(
            &Client::new(),
            &base_url(&server),
            "token",
            &playlist(),
            &["t9".to_string()],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        add_tracks_to_playlist(&Client::new(), &base_url(&server), "token", &playlist(), &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mutation_failure_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = add_tracks_to_playlist(
            &Client::new(),
            &base_url(&server),
            "token",
            &playlist(),
            &["t1".to_string()],
        )
        .await;

        assert!(matches!(result, Err(Error::Transport { .. })));
    }
}
