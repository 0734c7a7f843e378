use integration_tests::{CountingGateway, FailOn};
use rd_core::{cast_vote, FeedGateway, PostComposer, ViewerId, VoteDirection, VoteOutcome, VoteSummary};
use tokio_test::{assert_err, assert_ok};

async fn seeded(fail_on: FailOn) -> (CountingGateway, rd_core::PostId) {
    let gateway = CountingGateway::new(fail_on);
    let mut composer = PostComposer::new();
    composer.form_mut().title = "Vote on me".to_string();
    composer.form_mut().topic = "rust".to_string();
    let id = composer.submit(&gateway, Some(&ViewerId::new("alice"))).await.unwrap();
    (gateway, id)
}

#[tokio::test]
async fn test_anonymous_vote_needs_sign_in_and_writes_nothing() {
    let (gateway, id) = seeded(FailOn::Nothing).await;
    let before = gateway.calls();

    let outcome = assert_ok!(cast_vote(&gateway, &id, None, VoteDirection::Up).await);
    assert_eq!(outcome, VoteOutcome::SignInRequired);
    assert_eq!(gateway.calls(), before);
}

#[tokio::test]
async fn test_vote_returns_fresh_tally() {
    let (gateway, id) = seeded(FailOn::Nothing).await;
    let bob = ViewerId::new("bob");
    let carol = ViewerId::new("carol");

    let outcome = assert_ok!(cast_vote(&gateway, &id, Some(&bob), VoteDirection::Up).await);
    assert_eq!(
        outcome,
        VoteOutcome::Recorded(VoteSummary { net_tally: 1, viewer_vote: Some(VoteDirection::Up) })
    );

    let outcome = assert_ok!(cast_vote(&gateway, &id, Some(&carol), VoteDirection::Down).await);
    // zero sum resolves towards the first record (bob's upvote)
    assert_eq!(
        outcome,
        VoteOutcome::Recorded(VoteSummary { net_tally: 1, viewer_vote: Some(VoteDirection::Down) })
    );

    assert_eq!(CountingGateway::count(&gateway.vote_creates), 2);
    assert_eq!(CountingGateway::count(&gateway.vote_reads), 2);
}

#[tokio::test]
async fn test_repeat_votes_all_count() {
    let (gateway, id) = seeded(FailOn::Nothing).await;
    let bob = ViewerId::new("bob");

    for _ in 0..3 {
        assert_ok!(cast_vote(&gateway, &id, Some(&bob), VoteDirection::Up).await);
    }
    let votes = gateway.inner.read_votes_by_post(&id).await.unwrap();
    assert_eq!(rd_core::tally(&votes, Some(&bob)).net_tally, 3);
}

#[tokio::test]
async fn test_vote_write_failure_is_remote_error() {
    let (gateway, id) = seeded(FailOn::CreateVote).await;

    let err = assert_err!(cast_vote(&gateway, &id, Some(&"bob".into()), VoteDirection::Up).await);
    assert!(err.is_remote());
    assert_eq!(CountingGateway::count(&gateway.vote_reads), 0);
}

#[tokio::test]
async fn test_vote_reread_failure_is_remote_error() {
    let (gateway, id) = seeded(FailOn::ReadVotes).await;

    let err = assert_err!(cast_vote(&gateway, &id, Some(&"bob".into()), VoteDirection::Down).await);
    assert!(err.is_remote());
    // the write itself went through
    assert_eq!(gateway.inner.read_votes_by_post(&id).await.unwrap().len(), 1);
}
