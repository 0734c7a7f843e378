//! # Feed Assembly
//!
//! Picks the right read for the page being shown and projects each post into
//! what the post card displays.

use serde::Serialize;
use tracing::debug;
use crate::error::{AppError, Result};
use crate::models::{Post, ViewerId};
use crate::traits::FeedGateway;
use crate::votes::{tally, VoteSummary};

/// Loads the posts for a topic page, or every post when `topic` is `None`.
///
/// Whatever the gateway returns is passed through as-is: no merging,
/// paging, or caching happens here.
pub async fn load_feed<G>(gateway: &G, topic: Option<&str>) -> Result<Vec<Post>>
where
    G: FeedGateway + ?Sized,
{
    let posts = match topic {
        Some(topic) => gateway.read_posts_by_topic(topic).await,
        None => gateway.read_all_posts().await,
    }
    .map_err(AppError::RemoteOperation)?;

    debug!(topic = ?topic, count = posts.len(), "feed loaded");
    Ok(posts)
}

/// A post together with the numbers its card shows.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub votes: VoteSummary,
    pub comment_count: usize,
}

impl FeedEntry {
    pub fn new(post: Post, viewer: Option<&ViewerId>) -> Self {
        let votes = tally(&post.votes, viewer);
        let comment_count = post.comments.len();
        Self { post, votes, comment_count }
    }

    /// Name of the post's topic, when the gateway joined it.
    pub fn topic_name(&self) -> Option<&str> {
        self.post.topic.as_ref().map(|t| t.name.as_str())
    }
}

/// Builds feed entries for `viewer`, keeping the gateway's order.
pub fn entries(posts: Vec<Post>, viewer: Option<&ViewerId>) -> Vec<FeedEntry> {
    posts.into_iter().map(|post| FeedEntry::new(post, viewer)).collect()
}
