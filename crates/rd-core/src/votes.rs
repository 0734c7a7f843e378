//! # Vote Aggregation
//!
//! Turns the raw vote records of one post into the number shown next to it
//! and the arrow state for the current viewer.

use serde::Serialize;
use crate::models::{ViewerId, Vote, VoteDirection};

/// Net tally and the viewer's own vote for a single post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteSummary {
    pub net_tally: i64,
    /// `None` when the viewer is anonymous or has not voted
    pub viewer_vote: Option<VoteDirection>,
}

/// Aggregates `votes` for `viewer`.
///
/// Every record counts, including repeated votes from the same voter. A
/// non-empty collection that sums to zero reports +1 or -1 following the
/// direction of its first record; see DESIGN.md before changing that.
pub fn tally(votes: &[Vote], viewer: Option<&ViewerId>) -> VoteSummary {
    VoteSummary {
        net_tally: net_tally(votes),
        viewer_vote: viewer.and_then(|v| viewer_vote(votes, v)),
    }
}

fn net_tally(votes: &[Vote]) -> i64 {
    let Some(first) = votes.first() else {
        return 0;
    };

    let sum: i64 = votes
        .iter()
        .map(|v| if v.direction.is_up() { 1 } else { -1 })
        .sum();

    match sum {
        0 if first.direction.is_up() => 1,
        0 => -1,
        n => n,
    }
}

fn viewer_vote(votes: &[Vote], viewer: &ViewerId) -> Option<VoteDirection> {
    votes.iter().find(|v| &v.voter == viewer).map(|v| v.direction)
}
