//! # Vote Casting
//!
//! Records a vote, then re-reads the post's votes so the returned tally
//! reflects the backend rather than a locally patched number.

use tracing::{debug, info};
use crate::error::{AppError, Result};
use crate::models::{PostId, ViewerId, VoteDirection};
use crate::traits::FeedGateway;
use crate::votes::{tally, VoteSummary};

/// What happened when a viewer clicked a vote arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Nobody is signed in; nothing was sent
    SignInRequired,
    /// The vote was written and the post's votes re-read
    Recorded(VoteSummary),
}

/// Casts `direction` on `post_id` as `viewer`.
///
/// One-vote-per-viewer is not enforced here; repeat clicks write repeat
/// records and the tally counts them all.
pub async fn cast_vote<G>(
    gateway: &G,
    post_id: &PostId,
    viewer: Option<&ViewerId>,
    direction: VoteDirection,
) -> Result<VoteOutcome>
where
    G: FeedGateway + ?Sized,
{
    let Some(voter) = viewer else {
        debug!(%post_id, "vote ignored, viewer not signed in");
        return Ok(VoteOutcome::SignInRequired);
    };

    let vote = gateway
        .create_vote(post_id, voter, direction)
        .await
        .map_err(AppError::RemoteOperation)?;
    info!(%post_id, vote_id = %vote.id, voter = %voter, ?direction, "vote recorded");

    let votes = gateway
        .read_votes_by_post(post_id)
        .await
        .map_err(AppError::RemoteOperation)?;

    Ok(VoteOutcome::Recorded(tally(&votes, Some(voter))))
}
