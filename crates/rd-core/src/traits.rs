//! # Core Traits (Ports)
//!
//! Any gateway plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::models::{NewPost, Post, PostId, Topic, ViewerId, Vote, VoteDirection};

/// Remote read/write contract for topics, posts, and votes.
///
/// Every call is a request/response pair against the backend. Errors are
/// opaque to the core; it never inspects them beyond "it failed".
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FeedGateway: Send + Sync {
    // Topic Operations
    async fn read_topics_by_name(&self, name: &str) -> anyhow::Result<Vec<Topic>>;
    async fn create_topic(&self, name: &str) -> anyhow::Result<Topic>;

    // Post Operations
    async fn create_post(&self, post: NewPost) -> anyhow::Result<Post>;
    async fn read_all_posts(&self) -> anyhow::Result<Vec<Post>>;
    async fn read_posts_by_topic(&self, topic: &str) -> anyhow::Result<Vec<Post>>;

    // Vote Operations
    async fn read_votes_by_post(&self, post_id: &PostId) -> anyhow::Result<Vec<Vote>>;
    async fn create_vote(
        &self,
        post_id: &PostId,
        voter: &ViewerId,
        direction: VoteDirection,
    ) -> anyhow::Result<Vote>;
}
