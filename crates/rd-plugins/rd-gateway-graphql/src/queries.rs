//! GraphQL documents sent to the backend.
//!
//! Field selections match what the wire records in `wire.rs` expect.

pub const GET_SUBREDDIT_BY_TOPIC: &str = r#"
query GetSubredditListByTopic($topic: String!) {
  getSubredditListByTopic(topic: $topic) {
    id
    topic
    created_at
  }
}
"#;

pub const ADD_SUBREDDIT: &str = r#"
mutation InsertSubreddit($topic: String!) {
  insertSubreddit(topic: $topic) {
    id
    topic
    created_at
  }
}
"#;

pub const ADD_POST: &str = r#"
mutation InsertPost(
  $body: String!
  $image: String!
  $subreddit_id: ID!
  $title: String!
  $username: String!
) {
  insertPost(
    body: $body
    image: $image
    subreddit_id: $subreddit_id
    title: $title
    username: $username
  ) {
    id
    title
    body
    image
    username
    subreddit_id
    created_at
  }
}
"#;

pub const GET_VOTES_BY_POST_ID: &str = r#"
query GetVotesByPostId($post_id: ID!) {
  getVotesByPostId(post_id: $post_id) {
    id
    post_id
    username
    upvote
    created_at
  }
}
"#;

pub const ADD_VOTE: &str = r#"
mutation InsertVote($post_id: ID!, $username: String!, $upvote: Boolean!) {
  insertVote(post_id: $post_id, username: $username, upvote: $upvote) {
    id
    post_id
    username
    upvote
    created_at
  }
}
"#;

const POST_FIELDS: &str = r#"
    id
    title
    body
    username
    image
    subreddit_id
    created_at
    comments {
      id
      post_id
      username
      text
      created_at
    }
    subreddit {
      id
      topic
      created_at
    }
    votes {
      id
      post_id
      username
      upvote
      created_at
    }
"#;

pub fn get_all_posts() -> String {
    format!("query GetPostList {{\n  getPostList {{{POST_FIELDS}  }}\n}}\n")
}

pub fn get_posts_by_topic() -> String {
    format!(
        "query GetPostListByTopic($topic: String!) {{\n  getPostListByTopic(topic: $topic) {{{POST_FIELDS}  }}\n}}\n"
    )
}
