use crate::error::Result;
use crate::operation::Operation;
use crate::ports::spotify::{PlaylistRef, SpotifyClient, TrackId, TrackSet};
use crate::services::set_operation::{PlaylistOperand, apply};

/// What has to change for the output playlist to hold exactly `desired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub desired: TrackSet,
    pub to_add: Vec<TrackId>,
    pub to_remove: Vec<TrackId>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Result of a reconcile run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub desired: usize,
    pub added: usize,
    pub removed: usize,
    pub batches: usize,
    pub dry_run: bool,
}

pub struct ReconcileService<C: SpotifyClient> {
    client: C,
    dry_run: bool,
}

impl<C: SpotifyClient> ReconcileService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Compute and log the changes, but don't send them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Works out which tracks to add to and remove from `output` so that it
    /// ends up holding `operation` applied to `a` and `b`. Read-only.
    pub async fn plan(
        &self,
        operation: Operation,
        a: &PlaylistOperand,
        b: &PlaylistOperand,
        output: &PlaylistRef,
    ) -> Result<ReconcilePlan> {
        let desired = apply(&self.client, operation, a, b).await?;
        log::info!(
            "Operation {operation} ({}) yielded {} tracks",
            operation.description(),
            desired.len()
        );

        let current: TrackSet = self
            .client
            .playlist_track_ids(output)
            .await?
            .into_iter()
            .collect();

        let desired_operand = PlaylistOperand::Materialized(desired.clone());
        let current = PlaylistOperand::Materialized(current);
        let to_add = sorted_ids(
            apply(&self.client, Operation::A_ONLY, &desired_operand, &current).await?,
        );
        let to_remove = sorted_ids(
            apply(&self.client, Operation::B_ONLY, &desired_operand, &current).await?,
        );

        Ok(ReconcilePlan {
            desired,
            to_add,
            to_remove,
        })
    }

    /// Makes `output` hold exactly `operation` applied to `a` and `b`.
    ///
    /// Additions go first, then removals, each split into batches of at most
    /// [`SpotifyClient::batch_limit`] tracks sent one after the other. The
    /// first failure stops the run; batches already sent stay applied.
    pub async fn reconcile(
        &self,
        operation: Operation,
        a: &PlaylistOperand,
        b: &PlaylistOperand,
        output: &PlaylistRef,
    ) -> Result<ReconcileSummary> {
        let plan = self.plan(operation, a, b, output).await?;

        log::info!("{} tracks to add to playlist {output}", plan.to_add.len());
        log::info!("{} tracks to remove from playlist {output}", plan.to_remove.len());

        let mut summary = ReconcileSummary {
            desired: plan.desired.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        if self.dry_run {
            for track_id in &plan.to_add {
                log::info!("Would add {track_id}");
            }
            for track_id in &plan.to_remove {
                log::info!("Would remove {track_id}");
            }
            return Ok(summary);
        }

        if plan.is_noop() {
            log::info!("Playlist {output} is already up to date");
            return Ok(summary);
        }

        let limit = self.client.batch_limit();

        for batch in batches(&plan.to_add, limit) {
            log::debug!("Adding batch of {} tracks to {output}", batch.len());
            self.client.add_tracks(output, batch).await?;
            summary.added += batch.len();
            summary.batches += 1;
        }

        for batch in batches(&plan.to_remove, limit) {
            log::debug!("Removing batch of {} tracks from {output}", batch.len());
            self.client.remove_tracks(output, batch).await?;
            summary.removed += batch.len();
            summary.batches += 1;
        }

        log::info!(
            "Reconciled {output}: {} added, {} removed in {} requests",
            summary.added,
            summary.removed,
            summary.batches
        );

        Ok(summary)
    }
}

/// Consecutive slices of at most `limit` ids, in order. A zero limit is treated as one.
pub fn batches(track_ids: &[TrackId], limit: usize) -> std::slice::Chunks<'_, TrackId> {
    track_ids.chunks(limit.max(1))
}

// Empty ids can't be sent to the API.
fn sorted_ids(tracks: TrackSet) -> Vec<TrackId> {
    let mut ids: Vec<TrackId> = tracks.into_iter().filter(|id| !id.is_empty()).collect();
    ids.sort_unstable();
    ids
}
