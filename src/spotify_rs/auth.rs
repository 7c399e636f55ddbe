use crate::error::{Error, Result};

const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Client id of the registered app. Client ids are public.
pub const DEFAULT_CLIENT_ID: &str = "bd9297adefb44ddfac570814af8aaa05";

/// The registered redirect URI. It points at a page that doesn't exist: the
/// token is read from the address bar after the redirect.
pub const DEFAULT_REDIRECT_URI: &str =
    "http://tk5Vc6D835LtapxZIRMtfdWeWrJj5h2B-spotify-playlist-set-theory.com/";

pub const SPOTIFY_SCOPES: [&str; 2] = ["playlist-modify-public", "playlist-modify-private"];

/// Builds the implicit grant URL. After authorizing, Spotify redirects to
/// `redirect_uri` with the token in the `access_token` fragment parameter.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
    format!(
        "{}?client_id={}&response_type=token&redirect_uri={}&scope={}",
        SPOTIFY_AUTH_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&SPOTIFY_SCOPES.join(" "))
    )
}

/// A bearer token for the Web API. Never printed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::auth("the access token is empty"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(Error::auth("the access token contains whitespace"));
        }
        Ok(Self(token.to_string()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Picks the first token that was supplied, failing with instructions for
/// getting one when there is none.
pub fn resolve_access_token(
    candidates: impl IntoIterator<Item = Option<String>>,
    client_id: &str,
    redirect_uri: &str,
) -> Result<AccessToken> {
    match candidates.into_iter().flatten().next() {
        Some(token) => AccessToken::parse(&token),
        None => Err(Error::auth(format!(
            "no access token. Open {} , authorize the app, then copy the `access_token` \
             parameter from the URL you are redirected to into SPOTIFY_ACCESS_TOKEN",
            authorize_url(client_id, redirect_uri)
        ))),
    }
}
