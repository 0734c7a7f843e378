//! # rd-gateway-graphql
//!
//! `FeedGateway` over a hosted GraphQL endpoint.
//! Every call is a fresh POST; nothing is cached between reads.

mod queries;
mod wire;

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use rd_core::models::{NewPost, Post, PostId, Topic, ViewerId, Vote, VoteDirection};
use rd_core::traits::FeedGateway;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::wire::{WirePost, WireSubreddit, WireVote};

pub struct GraphqlGateway {
    client: Client,
    /// Full URL of the GraphQL endpoint
    endpoint: String,
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

impl GraphqlGateway {
    /// Builds a client that sends `Authorization: Apikey <key>` when a key is given.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<&SecretString>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Apikey {}", key.expose_secret()))
                .context("API key contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one operation and decodes `data.<field>`.
    async fn execute<T>(&self, field: &str, query: &str, variables: Value) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(operation = field, "graphql request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .with_context(|| format!("{field}: request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("{field}: backend returned {status}: {text}");
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .with_context(|| format!("{field}: response was not valid GraphQL JSON"))?;

        decode_field(field, body)
    }
}

/// Pulls `field` out of a GraphQL envelope, failing on any reported error.
fn decode_field<T>(field: &str, body: GraphqlResponse) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    if !body.errors.is_empty() {
        let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
        bail!("{field}: {}", messages.join("; "));
    }

    let mut data = body.data.ok_or_else(|| anyhow!("{field}: response has no data"))?;
    let value = data.remove(field).unwrap_or(Value::Null);
    serde_json::from_value(value).with_context(|| format!("{field}: unexpected response shape"))
}

fn post_variables(post: &NewPost) -> Value {
    json!({
        "title": post.title,
        "body": post.body,
        "image": post.image.as_deref().unwrap_or(""),
        "subreddit_id": post.topic_id.as_str(),
        "username": post.author.as_str(),
    })
}

fn required<T>(field: &str, value: Option<T>) -> anyhow::Result<T> {
    value.ok_or_else(|| anyhow!("{field}: backend returned null"))
}

#[async_trait]
impl FeedGateway for GraphqlGateway {
    async fn read_topics_by_name(&self, name: &str) -> anyhow::Result<Vec<Topic>> {
        let found: Option<Vec<WireSubreddit>> = self
            .execute(
                "getSubredditListByTopic",
                queries::GET_SUBREDDIT_BY_TOPIC,
                json!({ "topic": name }),
            )
            .await?;
        Ok(found.unwrap_or_default().into_iter().map(Topic::from).collect())
    }

    async fn create_topic(&self, name: &str) -> anyhow::Result<Topic> {
        let created: Option<WireSubreddit> = self
            .execute("insertSubreddit", queries::ADD_SUBREDDIT, json!({ "topic": name }))
            .await?;
        required("insertSubreddit", created).map(Topic::from)
    }

    async fn create_post(&self, post: NewPost) -> anyhow::Result<Post> {
        let created: Option<WirePost> = self
            .execute("insertPost", queries::ADD_POST, post_variables(&post))
            .await?;
        required("insertPost", created).map(Post::from)
    }

    async fn read_all_posts(&self) -> anyhow::Result<Vec<Post>> {
        let posts: Option<Vec<WirePost>> = self
            .execute("getPostList", &queries::get_all_posts(), json!({}))
            .await?;
        Ok(posts.unwrap_or_default().into_iter().map(Post::from).collect())
    }

    async fn read_posts_by_topic(&self, topic: &str) -> anyhow::Result<Vec<Post>> {
        let posts: Option<Vec<WirePost>> = self
            .execute(
                "getPostListByTopic",
                &queries::get_posts_by_topic(),
                json!({ "topic": topic }),
            )
            .await?;
        Ok(posts.unwrap_or_default().into_iter().map(Post::from).collect())
    }

    async fn read_votes_by_post(&self, post_id: &PostId) -> anyhow::Result<Vec<Vote>> {
        let votes: Option<Vec<WireVote>> = self
            .execute(
                "getVotesByPostId",
                queries::GET_VOTES_BY_POST_ID,
                json!({ "post_id": post_id.as_str() }),
            )
            .await?;
        Ok(votes.unwrap_or_default().into_iter().map(Vote::from).collect())
    }

    async fn create_vote(
        &self,
        post_id: &PostId,
        voter: &ViewerId,
        direction: VoteDirection,
    ) -> anyhow::Result<Vote> {
        let created: Option<WireVote> = self
            .execute(
                "insertVote",
                queries::ADD_VOTE,
                json!({
                    "post_id": post_id.as_str(),
                    "username": voter.as_str(),
                    "upvote": direction.is_up(),
                }),
            )
            .await?;
        required("insertVote", created).map(Vote::from)
    }
}
