//! # Post Submission
//!
//! Coordinates the "create a post" flow: validate the form, resolve the topic,
//! write the post, then reset the form or keep it for a retry.
//!
//! Progress is reported through [`Notice`], a three-state value the caller
//! renders however it likes (toast, status line, log).

use std::fmt;
use tracing::{info, warn};
use crate::error::{AppError, FormField, Result, ValidationErrors};
use crate::models::{NewPost, PostId, ViewerId};
use crate::topics::resolve_topic;
use crate::traits::FeedGateway;

/// The user-editable fields of the post box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub body: String,
    pub image: String,
    pub topic: String,
}

impl PostForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Status of the last submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Pending,
    Success { post_id: PostId },
    Failure,
}

impl Notice {
    pub fn is_pending(&self) -> bool {
        matches!(self, Notice::Pending)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Pending => f.write_str("Creating new post..."),
            Notice::Success { .. } => f.write_str("New post created!"),
            Notice::Failure => f.write_str("Whoops, something went wrong!"),
        }
    }
}

/// Holds the form state for one post box and runs submissions from it.
///
/// A composer opened inside a topic page carries that topic as fixed context;
/// the form's own topic field is then ignored.
#[derive(Debug, Clone, Default)]
pub struct PostComposer {
    form: PostForm,
    fixed_topic: Option<String>,
    notice: Option<Notice>,
}

impl PostComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer bound to an existing topic context (e.g., a topic page).
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            fixed_topic: Some(topic.into()),
            ..Self::default()
        }
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PostForm {
        &mut self.form
    }

    pub fn fixed_topic(&self) -> Option<&str> {
        self.fixed_topic.as_deref()
    }

    /// Outcome of the most recent submission, `None` before the first one.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Checks required fields without touching the network.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.form.title.trim().is_empty() {
            errors.push(FormField::Title, "A post title is required");
        }
        if self.fixed_topic.is_none() && self.form.topic.trim().is_empty() {
            errors.push(FormField::Topic, "A topic is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Submits the current form as `viewer`, discarding progress notices.
    pub async fn submit<G>(&mut self, gateway: &G, viewer: Option<&ViewerId>) -> Result<PostId>
    where
        G: FeedGateway + ?Sized,
    {
        self.submit_with(gateway, viewer, |_| {}).await
    }

    /// Submits the current form as `viewer`, reporting progress to `on_notice`.
    ///
    /// Field validation runs first, then the sign-in check; an anonymous
    /// submit of an incomplete form gets the per-field errors. Either failure
    /// makes no remote calls and emits no notice.
    ///
    /// Otherwise `on_notice` sees `Pending` before the first remote call and
    /// then exactly one of `Success` or `Failure`. On success the form is
    /// cleared; on a remote failure it is left untouched for a retry.
    pub async fn submit_with<G, F>(
        &mut self,
        gateway: &G,
        viewer: Option<&ViewerId>,
        mut on_notice: F,
    ) -> Result<PostId>
    where
        G: FeedGateway + ?Sized,
        F: FnMut(&Notice),
    {
        self.validate().map_err(AppError::Validation)?;
        let Some(author) = viewer else {
            return Err(AppError::Unauthenticated("sign in to post".to_string()));
        };

        self.set_notice(Notice::Pending, &mut on_notice);

        let result = self.commit(gateway, author).await;
        match result {
            Ok(post_id) => {
                info!(%post_id, author = %author, "post created");
                self.form.clear();
                self.set_notice(Notice::Success { post_id: post_id.clone() }, &mut on_notice);
                Ok(post_id)
            }
            Err(err) => {
                warn!(error = %err, author = %author, "post submission failed");
                self.set_notice(Notice::Failure, &mut on_notice);
                Err(err)
            }
        }
    }

    fn set_notice<F>(&mut self, notice: Notice, on_notice: &mut F)
    where
        F: FnMut(&Notice),
    {
        on_notice(&notice);
        self.notice = Some(notice);
    }

    /// Topic resolution and post write, as one failure domain.
    async fn commit<G>(&self, gateway: &G, author: &ViewerId) -> Result<PostId>
    where
        G: FeedGateway + ?Sized,
    {
        let topic_name = self.fixed_topic.as_deref().unwrap_or(&self.form.topic);
        let topic_id = resolve_topic(gateway, topic_name).await?;

        // blank means no image; anything else goes out as typed
        let image = Some(&self.form.image)
            .filter(|s| !s.trim().is_empty())
            .cloned();

        let post = gateway
            .create_post(NewPost {
                title: self.form.title.clone(),
                body: self.form.body.clone(),
                image,
                topic_id,
                author: author.clone(),
            })
            .await
            .map_err(AppError::RemoteOperation)?;

        Ok(post.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, Topic};
    use crate::traits::MockFeedGateway;
    use chrono::Utc;
    use uuid::Uuid;

    fn filled(composer: &mut PostComposer, title: &str, topic: &str) {
        let form = composer.form_mut();
        form.title = title.to_string();
        form.body = "some words".to_string();
        form.topic = topic.to_string();
    }

    fn topic(name: &str) -> Topic {
        Topic { id: Uuid::now_v7().into(), name: name.to_string(), created_at: Utc::now() }
    }

    fn post_from(new: NewPost) -> Post {
        Post {
            id: Uuid::now_v7().into(),
            title: new.title,
            body: new.body,
            image: new.image,
            topic_id: new.topic_id,
            topic: None,
            author: new.author,
            created_at: Utc::now(),
            comments: vec![],
            votes: vec![],
        }
    }

    #[tokio::test]
    async fn test_empty_title_makes_no_remote_calls() {
        let gateway = MockFeedGateway::new();
        let mut composer = PostComposer::new();
        filled(&mut composer, "   ", "rust");

        let err = composer.submit(&gateway, Some(&"alice".into())).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FormField::Title]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(composer.notice().is_none());
        assert_eq!(composer.form().topic, "rust");
    }

    #[tokio::test]
    async fn test_missing_title_and_topic_reported_per_field() {
        let gateway = MockFeedGateway::new();
        let mut composer = PostComposer::new();

        let err = composer.submit(&gateway, Some(&"alice".into())).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.message_for(FormField::Title), Some("A post title is required"));
        assert_eq!(errors.message_for(FormField::Topic), Some("A topic is required"));
    }

    #[test]
    fn test_fixed_topic_skips_topic_field_check() {
        let composer = {
            let mut c = PostComposer::for_topic("rust");
            c.form_mut().title = "Hello".to_string();
            c
        };
        assert!(composer.validate().is_ok());
    }

    #[tokio::test]
    async fn test_anonymous_viewer_is_rejected() {
        let gateway = MockFeedGateway::new();
        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");

        let err = composer.submit(&gateway, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
        assert!(composer.notice().is_none());
    }

    #[tokio::test]
    async fn test_successful_submission_resets_form() {
        let mut gateway = MockFeedGateway::new();
        gateway.expect_read_topics_by_name().times(1).returning(|_| Ok(vec![]));
        gateway
            .expect_create_topic()
            .times(1)
            .returning(|name| Ok(topic(name)));
        gateway
            .expect_create_post()
            .withf(|p| p.title == "Hello" && p.author.as_str() == "alice" && p.image.is_none())
            .times(1)
            .returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");

        let post_id = composer.submit(&gateway, Some(&"alice".into())).await.unwrap();
        assert_eq!(composer.notice(), Some(&Notice::Success { post_id }));
        assert_eq!(composer.form(), &PostForm::default());
    }

    #[tokio::test]
    async fn test_notices_go_pending_then_success() {
        let mut gateway = MockFeedGateway::new();
        gateway.expect_read_topics_by_name().returning(|name| Ok(vec![topic(name)]));
        gateway.expect_create_post().times(1).returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");

        let mut seen = Vec::new();
        let post_id = composer
            .submit_with(&gateway, Some(&"alice".into()), |n| seen.push(n.clone()))
            .await
            .unwrap();
        assert_eq!(seen, vec![Notice::Pending, Notice::Success { post_id }]);
        assert_eq!(seen[0].to_string(), "Creating new post...");
    }

    #[tokio::test]
    async fn test_notices_go_pending_then_failure() {
        let mut gateway = MockFeedGateway::new();
        gateway.expect_read_topics_by_name().returning(|name| Ok(vec![topic(name)]));
        gateway
            .expect_create_post()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("timeout")));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");

        let mut seen = Vec::new();
        let result = composer
            .submit_with(&gateway, Some(&"alice".into()), |n| seen.push(n.clone()))
            .await;
        assert!(result.is_err());
        assert_eq!(seen, vec![Notice::Pending, Notice::Failure]);
    }

    #[tokio::test]
    async fn test_rejected_submission_emits_no_notice() {
        let gateway = MockFeedGateway::new();
        let mut composer = PostComposer::new();

        let mut seen = Vec::new();
        let result = composer
            .submit_with(&gateway, Some(&"alice".into()), |n| seen.push(n.clone()))
            .await;
        assert!(result.unwrap_err().is_validation());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_incomplete_form_reports_fields_first() {
        let gateway = MockFeedGateway::new();
        let mut composer = PostComposer::new();
        filled(&mut composer, "", "rust");

        let err = composer.submit(&gateway, None).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.message_for(FormField::Title), Some("A post title is required"));
    }

    #[tokio::test]
    async fn test_fixed_topic_wins_over_form_field() {
        let existing = topic("rust");
        let existing_id = existing.id.clone();
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .withf(|name| name == "rust")
            .times(1)
            .returning(move |_| Ok(vec![existing.clone()]));
        gateway.expect_create_topic().never();
        gateway
            .expect_create_post()
            .withf(move |p| p.topic_id == existing_id)
            .times(1)
            .returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::for_topic("rust");
        filled(&mut composer, "Hello", "ignored");

        assert!(composer.submit(&gateway, Some(&"alice".into())).await.is_ok());
    }

    #[tokio::test]
    async fn test_image_reference_is_forwarded() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .returning(|name| Ok(vec![topic(name)]));
        gateway
            .expect_create_post()
            .withf(|p| p.image.as_deref() == Some("https://img.example/cat.png"))
            .times(1)
            .returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Cat", "pets");
        composer.form_mut().image = "https://img.example/cat.png".to_string();

        assert!(composer.submit(&gateway, Some(&"alice".into())).await.is_ok());
    }

    #[tokio::test]
    async fn test_image_reference_is_sent_as_entered() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .returning(|name| Ok(vec![topic(name)]));
        gateway
            .expect_create_post()
            .withf(|p| p.image.as_deref() == Some(" https://img.example/cat.png "))
            .times(1)
            .returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Cat", "pets");
        composer.form_mut().image = " https://img.example/cat.png ".to_string();

        assert!(composer.submit(&gateway, Some(&"alice".into())).await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_image_is_sent_as_none() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .returning(|name| Ok(vec![topic(name)]));
        gateway
            .expect_create_post()
            .withf(|p| p.image.is_none())
            .times(1)
            .returning(|p| Ok(post_from(p)));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Cat", "pets");
        composer.form_mut().image = "   ".to_string();

        assert!(composer.submit(&gateway, Some(&"alice".into())).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_post_failure_keeps_form() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .times(1)
            .returning(|name| Ok(vec![topic(name)]));
        gateway
            .expect_create_post()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("timeout")));

        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");
        let before = composer.form().clone();

        let err = composer.submit(&gateway, Some(&"alice".into())).await.unwrap_err();
        assert!(err.is_remote());
        assert_eq!(composer.notice(), Some(&Notice::Failure));
        assert_eq!(composer.form(), &before);
    }

    #[tokio::test]
    async fn test_topic_failure_never_writes_post() {
        let mut gateway = MockFeedGateway::new();
        gateway
            .expect_read_topics_by_name()
            .returning(|_| Err(anyhow::anyhow!("unreachable")));
        gateway.expect_create_topic().never();
        gateway.expect_create_post().never();

        let mut composer = PostComposer::new();
        filled(&mut composer, "Hello", "rust");

        assert!(composer.submit(&gateway, Some(&"alice".into())).await.is_err());
        assert_eq!(composer.notice(), Some(&Notice::Failure));
        assert_eq!(composer.form().title, "Hello");
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::Pending.to_string(), "Creating new post...");
        assert_eq!(Notice::Failure.to_string(), "Whoops, something went wrong!");
        assert!(Notice::Pending.is_pending());
    }
}
