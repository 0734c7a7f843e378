//! ruddit/crates/rd-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Ruddit.

pub mod models;
pub mod traits;
pub mod error;
pub mod votes;
pub mod topics;
pub mod submission;
pub mod feed;
pub mod voting;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
pub use votes::{tally, VoteSummary};
pub use topics::resolve_topic;
pub use submission::{Notice, PostComposer, PostForm};
pub use feed::{entries, load_feed, FeedEntry};
pub use voting::{cast_vote, VoteOutcome};
