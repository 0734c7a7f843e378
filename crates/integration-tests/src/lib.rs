//! Shared fixtures for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Barrier;
use rd_core::models::{NewPost, Post, PostId, Topic, ViewerId, Vote, VoteDirection};
use rd_core::traits::FeedGateway;
use rd_gateway_memory::MemoryGateway;

/// Which kind of call the wrapper should reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    ReadTopics,
    CreateTopic,
    CreatePost,
    ReadPosts,
    ReadVotes,
    CreateVote,
}

/// Wraps a `MemoryGateway`, counting every call and optionally failing one kind.
pub struct CountingGateway {
    pub inner: MemoryGateway,
    fail_on: FailOn,
    /// Holds each topic lookup until this many lookups have read the store
    read_barrier: Option<Barrier>,
    pub topic_reads: AtomicUsize,
    pub topic_creates: AtomicUsize,
    pub post_creates: AtomicUsize,
    pub post_reads: AtomicUsize,
    pub vote_reads: AtomicUsize,
    pub vote_creates: AtomicUsize,
}

impl CountingGateway {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            inner: MemoryGateway::new(),
            fail_on,
            read_barrier: None,
            topic_reads: AtomicUsize::new(0),
            topic_creates: AtomicUsize::new(0),
            post_creates: AtomicUsize::new(0),
            post_reads: AtomicUsize::new(0),
            vote_reads: AtomicUsize::new(0),
            vote_creates: AtomicUsize::new(0),
        }
    }

    /// Makes `parties` concurrent topic lookups all finish reading before
    /// any of them returns, so each sees the store as it was before the others
    /// could create anything.
    pub fn with_read_barrier(mut self, parties: usize) -> Self {
        self.read_barrier = Some(Barrier::new(parties));
        self
    }

    /// Total number of gateway calls of any kind.
    pub fn calls(&self) -> usize {
        [
            &self.topic_reads,
            &self.topic_creates,
            &self.post_creates,
            &self.post_reads,
            &self.vote_reads,
            &self.vote_creates,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn bump(&self, counter: &AtomicUsize, op: FailOn) -> anyhow::Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == op {
            anyhow::bail!("injected failure on {op:?}");
        }
        Ok(())
    }
}

#[async_trait]
impl FeedGateway for CountingGateway {
    async fn read_topics_by_name(&self, name: &str) -> anyhow::Result<Vec<Topic>> {
        self.bump(&self.topic_reads, FailOn::ReadTopics)?;
        let topics = self.inner.read_topics_by_name(name).await?;
        if let Some(barrier) = &self.read_barrier {
            barrier.wait().await;
        }
        Ok(topics)
    }

    async fn create_topic(&self, name: &str) -> anyhow::Result<Topic> {
        self.bump(&self.topic_creates, FailOn::CreateTopic)?;
        self.inner.create_topic(name).await
    }

    async fn create_post(&self, post: NewPost) -> anyhow::Result<Post> {
        self.bump(&self.post_creates, FailOn::CreatePost)?;
        self.inner.create_post(post).await
    }

    async fn read_all_posts(&self) -> anyhow::Result<Vec<Post>> {
        self.bump(&self.post_reads, FailOn::ReadPosts)?;
        self.inner.read_all_posts().await
    }

    async fn read_posts_by_topic(&self, topic: &str) -> anyhow::Result<Vec<Post>> {
        self.bump(&self.post_reads, FailOn::ReadPosts)?;
        self.inner.read_posts_by_topic(topic).await
    }

    async fn read_votes_by_post(&self, post_id: &PostId) -> anyhow::Result<Vec<Vote>> {
        self.bump(&self.vote_reads, FailOn::ReadVotes)?;
        self.inner.read_votes_by_post(post_id).await
    }

    async fn create_vote(
        &self,
        post_id: &PostId,
        voter: &ViewerId,
        direction: VoteDirection,
    ) -> anyhow::Result<Vote> {
        self.bump(&self.vote_creates, FailOn::CreateVote)?;
        self.inner.create_vote(post_id, voter, direction).await
    }
}
