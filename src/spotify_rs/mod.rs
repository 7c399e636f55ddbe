//! Thin wrappers over the Spotify Web API endpoints this tool uses.
//!
//! Docs:
//! https://developer.spotify.com/documentation/web-api/reference/get-playlists-tracks

pub mod auth;
pub mod playlist;
pub mod types;

pub use auth::{AccessToken, authorize_url, resolve_access_token};
