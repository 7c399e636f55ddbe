use std::borrow::Cow;

use crate::error::Result;
use crate::operation::Operation;
use crate::ports::spotify::{PlaylistRef, SpotifyClient, TrackSet};

/// One side of a set operation: either a playlist still to be fetched, or a
/// track set that is already in hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistOperand {
    Reference(PlaylistRef),
    Materialized(TrackSet),
}

impl From<PlaylistRef> for PlaylistOperand {
    fn from(playlist: PlaylistRef) -> Self {
        Self::Reference(playlist)
    }
}

impl From<TrackSet> for PlaylistOperand {
    fn from(tracks: TrackSet) -> Self {
        Self::Materialized(tracks)
    }
}

/// Fetches a referenced playlist; a materialized set is borrowed as-is.
pub async fn resolve<'a, C: SpotifyClient + ?Sized>(
    client: &C,
    operand: &'a PlaylistOperand,
) -> Result<Cow<'a, TrackSet>> {
    match operand {
        PlaylistOperand::Materialized(tracks) => Ok(Cow::Borrowed(tracks)),
        PlaylistOperand::Reference(playlist) => {
            let track_ids = client.playlist_track_ids(playlist).await?;
            Ok(Cow::Owned(track_ids.into_iter().collect()))
        }
    }
}

/// Applies `operation` to `a` and `b`, fetching whichever of them are references.
///
/// `000` returns the empty set without touching either operand, so it works
/// even when the references couldn't be fetched.
pub async fn apply<C: SpotifyClient + ?Sized>(
    client: &C,
    operation: Operation,
    a: &PlaylistOperand,
    b: &PlaylistOperand,
) -> Result<TrackSet> {
    if operation.is_empty() {
        return Ok(TrackSet::new());
    }

    let a = resolve(client, a).await?;
    let b = resolve(client, b).await?;
    Ok(combine(operation, &a, &b))
}

/// The pure part of [`apply`]: keeps each track of `a ∪ b` whose Venn region
/// is selected by `operation`.
pub fn combine(operation: Operation, a: &TrackSet, b: &TrackSet) -> TrackSet {
    let from_a = a.iter().filter(|track| {
        if b.contains(*track) {
            operation.keeps_both()
        } else {
            operation.keeps_a_only()
        }
    });

    let from_b = b
        .iter()
        .filter(|track| operation.keeps_b_only() && !a.contains(*track));

    from_a.chain(from_b).cloned().collect()
}
