//! # rd-gateway-memory
//!
//! Process-local implementation of `FeedGateway`.
//! Backs demos and integration tests; state lives only as long as the value.
//!
//! Topic names are unique at the storage layer: `create_topic` on a name that
//! already exists returns the stored topic instead of inserting a second one.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rd_core::models::{Comment, NewPost, Post, PostId, Topic, TopicId, ViewerId, Vote, VoteDirection};
use rd_core::traits::FeedGateway;
use anyhow::{bail, Context};
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryGateway {
    /// Keyed by exact topic name
    topics: DashMap<String, Topic>,
    /// Posts as written, without their joined relations
    posts: DashMap<PostId, Post>,
    votes: DashMap<PostId, Vec<Vote>>,
    comments: DashMap<PostId, Vec<Comment>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Attaches a comment to an existing post.
    pub fn add_comment(&self, post_id: &PostId, author: &ViewerId, text: &str) -> anyhow::Result<Comment> {
        if !self.posts.contains_key(post_id) {
            bail!("post {post_id} does not exist");
        }
        let comment = Comment {
            id: Uuid::now_v7().into(),
            post_id: post_id.clone(),
            author: author.clone(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.comments.entry(post_id.clone()).or_default().push(comment.clone());
        Ok(comment)
    }

    fn topic_by_id(&self, id: &TopicId) -> Option<Topic> {
        self.topics.iter().find(|t| &t.id == id).map(|t| t.value().clone())
    }

    /// Copies a stored post and joins its topic, votes, and comments.
    fn hydrate(&self, post: &Post) -> Post {
        let mut post = post.clone();
        post.topic = self.topic_by_id(&post.topic_id);
        post.votes = self.votes.get(&post.id).map(|v| v.value().clone()).unwrap_or_default();
        post.comments = self.comments.get(&post.id).map(|c| c.value().clone()).unwrap_or_default();
        post
    }

    /// Newest first, matching the hosted backend's list order.
    fn collect_posts<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let stored: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| keep(p.value()))
            .map(|p| p.value().clone())
            .collect();

        let mut posts: Vec<Post> = stored.iter().map(|p| self.hydrate(p)).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        posts
    }
}

#[async_trait]
impl FeedGateway for MemoryGateway {
    async fn read_topics_by_name(&self, name: &str) -> anyhow::Result<Vec<Topic>> {
        Ok(self.topics.get(name).map(|t| vec![t.value().clone()]).unwrap_or_default())
    }

    async fn create_topic(&self, name: &str) -> anyhow::Result<Topic> {
        let topic = self
            .topics
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(topic = %name, "inserting topic");
                Topic { id: Uuid::now_v7().into(), name: name.to_string(), created_at: Utc::now() }
            })
            .value()
            .clone();
        Ok(topic)
    }

    async fn create_post(&self, new: NewPost) -> anyhow::Result<Post> {
        let topic = self
            .topic_by_id(&new.topic_id)
            .with_context(|| format!("topic {} does not exist", new.topic_id))?;

        // v7 strings sort in creation order
        let post = Post {
            id: Uuid::now_v7().into(),
            title: new.title,
            body: new.body,
            image: new.image,
            topic_id: topic.id.clone(),
            topic: None,
            author: new.author,
            created_at: Utc::now(),
            comments: Vec::new(),
            votes: Vec::new(),
        };
        self.posts.insert(post.id.clone(), post.clone());
        Ok(Post { topic: Some(topic), ..post })
    }

    async fn read_all_posts(&self) -> anyhow::Result<Vec<Post>> {
        Ok(self.collect_posts(|_| true))
    }

    async fn read_posts_by_topic(&self, topic: &str) -> anyhow::Result<Vec<Post>> {
        let Some(topic_id) = self.topics.get(topic).map(|t| t.id.clone()) else {
            return Ok(Vec::new());
        };
        Ok(self.collect_posts(|p| p.topic_id == topic_id))
    }

    async fn read_votes_by_post(&self, post_id: &PostId) -> anyhow::Result<Vec<Vote>> {
        Ok(self.votes.get(post_id).map(|v| v.value().clone()).unwrap_or_default())
    }

    async fn create_vote(
        &self,
        post_id: &PostId,
        voter: &ViewerId,
        direction: VoteDirection,
    ) -> anyhow::Result<Vote> {
        if !self.posts.contains_key(post_id) {
            bail!("post {post_id} does not exist");
        }
        let vote = Vote {
            id: Uuid::now_v7().into(),
            post_id: post_id.clone(),
            voter: voter.clone(),
            direction,
            created_at: Utc::now(),
        };
        self.votes.entry(post_id.clone()).or_default().push(vote.clone());
        Ok(vote)
    }
}
