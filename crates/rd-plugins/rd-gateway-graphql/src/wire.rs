//! Wire records as the backend returns them, and their mapping into
//! `rd-core` domain models.

use chrono::{DateTime, Utc};
use rd_core::models::{
    Comment, CommentId, Post, PostId, Topic, TopicId, ViewerId, Vote, VoteDirection, VoteId,
};
use serde::{Deserialize, Deserializer};

/// GraphQL `ID` values arrive as strings, but some backends send serial
/// integers as JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn opaque_id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => T::from(s),
        RawId::Number(n) => T::from(n.to_string()),
    })
}

#[derive(Debug, Deserialize)]
pub struct WireSubreddit {
    #[serde(deserialize_with = "opaque_id")]
    pub id: TopicId,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl From<WireSubreddit> for Topic {
    fn from(w: WireSubreddit) -> Self {
        Topic { id: w.id, name: w.topic, created_at: w.created_at }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireVote {
    #[serde(deserialize_with = "opaque_id")]
    pub id: VoteId,
    #[serde(deserialize_with = "opaque_id")]
    pub post_id: PostId,
    pub username: String,
    pub upvote: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WireVote> for Vote {
    fn from(w: WireVote) -> Self {
        Vote {
            id: w.id,
            post_id: w.post_id,
            voter: ViewerId::new(w.username),
            direction: VoteDirection::from_upvote(w.upvote),
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireComment {
    #[serde(deserialize_with = "opaque_id")]
    pub id: CommentId,
    #[serde(deserialize_with = "opaque_id")]
    pub post_id: PostId,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<WireComment> for Comment {
    fn from(w: WireComment) -> Self {
        Comment {
            id: w.id,
            post_id: w.post_id,
            author: ViewerId::new(w.username),
            text: w.text,
            created_at: w.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WirePost {
    #[serde(deserialize_with = "opaque_id")]
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub username: String,
    /// The backend stores "no image" as an empty string
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "opaque_id")]
    pub subreddit_id: TopicId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Option<Vec<WireComment>>,
    #[serde(default)]
    pub votes: Option<Vec<WireVote>>,
    #[serde(default)]
    pub subreddit: Option<WireSubreddit>,
}

impl From<WirePost> for Post {
    fn from(w: WirePost) -> Self {
        Post {
            id: w.id,
            title: w.title,
            body: w.body.unwrap_or_default(),
            image: w.image.filter(|s| !s.trim().is_empty()),
            topic_id: w.subreddit_id,
            topic: w.subreddit.map(Topic::from),
            author: ViewerId::new(w.username),
            created_at: w.created_at,
            comments: w.comments.unwrap_or_default().into_iter().map(Comment::from).collect(),
            votes: w.votes.unwrap_or_default().into_iter().map(Vote::from).collect(),
        }
    }
}
