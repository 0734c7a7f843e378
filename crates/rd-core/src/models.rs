//! # Domain Models
//!
//! These structs represent the core entities of Ruddit.
//! Identifiers are assigned by the backend; the core never mints them and
//! never looks inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares a string-backed identifier newtype.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(PostId);
opaque_id!(TopicId);
opaque_id!(VoteId);
opaque_id!(CommentId);
opaque_id!(
    /// Opaque identifier of the person reading or writing.
    ///
    /// An absent viewer (`Option<&ViewerId>::None`) is an anonymous visitor.
    ViewerId
);

/// A named category posts belong to (e.g., "rust", "gardening").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    /// Unique, case-sensitive name. No normalization is applied.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Which way a vote points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn from_upvote(upvote: bool) -> Self {
        if upvote {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// A single vote record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub post_id: PostId,
    pub voter: ViewerId,
    pub direction: VoteDirection,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: ViewerId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The fundamental unit of the feed.
///
/// Votes and comments are separate backend records correlated by `post_id`;
/// the gateway hands back a fresh copy on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    /// URL of an attached image, if any
    pub image: Option<String>,
    pub topic_id: TopicId,
    /// Joined topic record, when the gateway returns it
    pub topic: Option<Topic>,
    pub author: ViewerId,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub votes: Vec<Vote>,
}

/// Write payload for `FeedGateway::create_post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub topic_id: TopicId,
    pub author: ViewerId,
}
