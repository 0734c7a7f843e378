//! # Topic Resolution
//!
//! Find-or-create for topics by exact name.
//!
//! The read and the create are two separate remote calls, so two submissions
//! racing on the same brand-new name can both create it. Closing that gap is
//! the backend's job (unique constraint with upsert); the in-memory gateway
//! shows what that looks like.

use tracing::{debug, info};
use crate::error::{AppError, Result};
use crate::models::TopicId;
use crate::traits::FeedGateway;

/// Returns the id of the topic called `name`, creating it if none exists.
///
/// Matching is exact: "Rust" and "rust " are different topics.
pub async fn resolve_topic<G>(gateway: &G, name: &str) -> Result<TopicId>
where
    G: FeedGateway + ?Sized,
{
    let existing = gateway
        .read_topics_by_name(name)
        .await
        .map_err(AppError::RemoteOperation)?;

    if let Some(topic) = existing.first() {
        debug!(topic = %name, topic_id = %topic.id, "using existing topic");
        return Ok(topic.id.clone());
    }

    let created = gateway
        .create_topic(name)
        .await
        .map_err(AppError::RemoteOperation)?;

    info!(topic = %name, topic_id = %created.id, "created topic");
    Ok(created.id)
}
