use std::sync::Arc;

use super::common::*;
use crate::infra::RecordingAlertPublisher;
use crate::workflows::triage::domain::{CandidateStatus, TriageDirection};
use crate::workflows::triage::queue::{TriageError, TriageQueue, TriageState};
use crate::workflows::triage::repository::StoreError;

#[test]
fn open_presents_the_highest_scored_candidate() {
    let (queue, _store, _alerts) =
        seeded_queue(&[("low", 40), ("top", 90), ("mid", 70)], config_with_limit(25));

    let current = queue.current().expect("candidate presented");
    assert_eq!(current.id.0, "top");
    assert_eq!(queue.state(), TriageState::Presenting(current.id.clone()));
    assert_eq!(queue.remaining(), 3);
}

#[test]
fn empty_store_opens_idle() {
    let (queue, _store, _alerts) = seeded_queue(&[], config_with_limit(25));
    assert_eq!(queue.state(), TriageState::Idle);
    assert!(queue.current().is_none());
}

#[test]
fn reject_advances_without_touching_the_quota() {
    let (mut queue, store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    let receipt = queue
        .decide(TriageDirection::Reject, now())
        .expect("reject commits");
    assert_eq!(receipt.candidate_id.0, "top");
    assert_eq!(receipt.accepts_remaining_today, 25);

    let rejected = stored_candidate(&store, "top");
    assert_eq!(rejected.status, CandidateStatus::Rejected);
    assert_eq!(rejected.decided_at, Some(now()));
    assert_eq!(stored_quota(&store).daily_accept_count, 0);

    assert_eq!(queue.current().expect("next candidate").id.0, "mid");
}

#[test]
fn accept_persists_status_and_increments_quota() {
    let (mut queue, store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    queue
        .decide(TriageDirection::Accept, now())
        .expect("accept commits");

    let accepted = stored_candidate(&store, "top");
    assert_eq!(accepted.status, CandidateStatus::Accepted);
    assert_eq!(accepted.decided_at, Some(now()));

    let quota = stored_quota(&store);
    assert_eq!(quota.daily_accept_count, 1);
    assert_eq!(quota.quota_date, today());
}

#[test]
fn undo_round_trip_restores_candidate_and_quota() {
    let (mut queue, store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    queue
        .decide(TriageDirection::Accept, now())
        .expect("accept commits");
    let restored = queue.undo().expect("undo commits");
    assert_eq!(restored.expect("slot held a decision").0, "top");

    let candidate = stored_candidate(&store, "top");
    assert_eq!(candidate.status, CandidateStatus::Pending);
    assert_eq!(candidate.decided_at, None);

    let quota = stored_quota(&store);
    assert_eq!(quota.daily_accept_count, 0);

    // The same candidate is presented again.
    assert_eq!(queue.current().expect("candidate presented").id.0, "top");
    assert_eq!(queue.remaining(), 2);
}

#[test]
fn undo_with_empty_slot_is_a_silent_noop() {
    let (mut queue, _store, _alerts) = seeded_queue(&[("top", 90)], config_with_limit(25));

    assert!(queue.undo().expect("noop undo").is_none());
    assert_eq!(queue.current().expect("still presented").id.0, "top");
}

#[test]
fn undo_holds_only_the_most_recent_decision() {
    let (mut queue, store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70), ("low", 40)], config_with_limit(25));

    queue
        .decide(TriageDirection::Accept, now())
        .expect("first decision");
    queue
        .decide(TriageDirection::Reject, now())
        .expect("second decision");

    let restored = queue.undo().expect("undo commits");
    assert_eq!(restored.expect("slot held a decision").0, "mid");
    assert!(queue.undo().expect("slot now empty").is_none());

    // The first decision stands.
    assert_eq!(
        stored_candidate(&store, "top").status,
        CandidateStatus::Accepted
    );
}

#[test]
fn store_failure_during_decide_leaves_everything_retryable() {
    let inner = crate::infra::InMemoryCandidateStore::default();
    inner
        .insert_new(&[scored_candidate("top", 90), scored_candidate("mid", 70)])
        .expect("seed candidates");
    let store = Arc::new(FailingDecisionStore { inner: inner.clone() });
    let alerts = Arc::new(RecordingAlertPublisher::default());
    let mut queue = TriageQueue::open(store, alerts, config_with_limit(25), today())
        .expect("queue opens");

    match queue.decide(TriageDirection::Accept, now()) {
        Err(TriageError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }

    // Same candidate presented, nothing decided, nothing to undo.
    assert_eq!(queue.current().expect("still presented").id.0, "top");
    assert_eq!(queue.remaining(), 2);
    assert!(queue.undo().expect("no slot recorded").is_none());
    assert_eq!(
        stored_candidate(&inner, "top").status,
        CandidateStatus::Pending
    );
}

#[test]
fn deciding_everything_exhausts_then_refill_resumes() {
    let (mut queue, _store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    queue
        .decide(TriageDirection::Reject, now())
        .expect("first decision");
    queue
        .decide(TriageDirection::Reject, now())
        .expect("second decision");
    assert_eq!(queue.state(), TriageState::Exhausted);

    let added = queue
        .refill(vec![scored_candidate("fresh", 60)])
        .expect("refill commits");
    assert_eq!(added, 1);
    assert_eq!(queue.current().expect("presenting again").id.0, "fresh");
}

#[test]
fn refill_dedups_by_id_against_pending_and_decided() {
    let (mut queue, _store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    queue
        .decide(TriageDirection::Reject, now())
        .expect("decide top");

    let added = queue
        .refill(vec![
            scored_candidate("top", 95),
            scored_candidate("mid", 65),
            scored_candidate("fresh", 50),
            scored_candidate("fresh", 50),
        ])
        .expect("refill commits");

    assert_eq!(added, 1, "only the unseen id is appended");
    assert_eq!(queue.remaining(), 2);
}

#[test]
fn refill_keeps_the_presented_candidate_when_not_exhausted() {
    let (mut queue, _store, _alerts) =
        seeded_queue(&[("top", 90), ("mid", 70)], config_with_limit(25));

    queue
        .decide(TriageDirection::Reject, now())
        .expect("decide top");
    assert_eq!(queue.current().expect("presenting").id.0, "mid");

    queue
        .refill(vec![scored_candidate("hot", 99)])
        .expect("refill commits");

    // The higher-scored arrival queues ahead but does not steal the
    // presentation.
    assert_eq!(queue.current().expect("still presenting").id.0, "mid");
    assert_eq!(queue.remaining(), 2);
}

#[test]
fn refill_sorts_by_score_with_stable_ties() {
    let (mut queue, _store, _alerts) = seeded_queue(&[], config_with_limit(25));

    queue
        .refill(vec![
            scored_candidate("first-70", 70),
            scored_candidate("second-70", 70),
            scored_candidate("top", 90),
        ])
        .expect("refill commits");

    queue
        .decide(TriageDirection::Reject, now())
        .expect("decide top");
    assert_eq!(queue.current().expect("presenting").id.0, "first-70");
    queue
        .decide(TriageDirection::Reject, now())
        .expect("decide first tie");
    assert_eq!(queue.current().expect("presenting").id.0, "second-70");
}

#[test]
fn first_accept_publishes_bootstrap_alert_exactly_once() {
    let (mut queue, _store, alerts) = seeded_queue(
        &[("top", 90), ("mid", 70), ("low", 40)],
        config_with_limit(25),
    );

    queue
        .decide(TriageDirection::Accept, now())
        .expect("first accept");
    assert_eq!(alerts.events().len(), 1);
    assert_eq!(alerts.events()[0].template, "first_candidate_accepted");

    // Undo-then-redo of the same decision must not refire the hook.
    queue.undo().expect("undo commits");
    queue
        .decide(TriageDirection::Accept, now())
        .expect("redo accept");
    assert_eq!(alerts.events().len(), 1);

    queue
        .decide(TriageDirection::Accept, now())
        .expect("second accept");
    assert_eq!(alerts.events().len(), 1);
}
