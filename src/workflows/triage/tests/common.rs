use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::TriageConfig;
use crate::infra::{InMemoryCandidateStore, RecordingAlertPublisher};
use crate::workflows::triage::domain::{Candidate, CandidateId, CandidateStatus, QuotaRecord};
use crate::workflows::triage::queue::TriageQueue;
use crate::workflows::triage::repository::{
    CandidateStore, ScoreUpdate, StoreError,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    now().date_naive()
}

pub(super) fn yesterday() -> NaiveDate {
    today().pred_opt().expect("valid date")
}

pub(super) fn scored_candidate(id: &str, fit_score: u8) -> Candidate {
    let mut candidate =
        Candidate::pending(CandidateId(id.to_string()), format!("Company {id}"));
    candidate.industry = Some("Software".to_string());
    candidate.location = Some("CA".to_string());
    candidate.fit_score = fit_score;
    candidate
}

pub(super) fn config_with_limit(daily_accept_limit: u32) -> TriageConfig {
    TriageConfig { daily_accept_limit }
}

pub(super) type MemoryQueue = TriageQueue<InMemoryCandidateStore, RecordingAlertPublisher>;

pub(super) fn seeded_queue(
    scores: &[(&str, u8)],
    config: TriageConfig,
) -> (
    MemoryQueue,
    Arc<InMemoryCandidateStore>,
    Arc<RecordingAlertPublisher>,
) {
    let store = Arc::new(InMemoryCandidateStore::default());
    let candidates: Vec<Candidate> = scores
        .iter()
        .map(|(id, score)| scored_candidate(id, *score))
        .collect();
    store.insert_new(&candidates).expect("seed candidates");

    let alerts = Arc::new(RecordingAlertPublisher::default());
    let queue = TriageQueue::open(store.clone(), alerts.clone(), config, today())
        .expect("queue opens");

    (queue, store, alerts)
}

pub(super) fn stored_candidate(store: &InMemoryCandidateStore, id: &str) -> Candidate {
    store
        .all_candidates()
        .expect("store reads")
        .into_iter()
        .find(|candidate| candidate.id.0 == id)
        .expect("candidate present")
}

/// Persist a quota record through a decided placeholder candidate, which is
/// how the paired-write trait exposes quota writes. The placeholder must be
/// inserted by the caller as `dummy`.
pub(super) fn seed_quota(store: &InMemoryCandidateStore, quota: QuotaRecord) {
    let mut decided = scored_candidate("dummy", 0);
    decided.status = CandidateStatus::Rejected;
    store
        .persist_decision(&decided, &quota)
        .expect("seed quota");
}

pub(super) fn stored_quota(store: &InMemoryCandidateStore) -> QuotaRecord {
    store
        .load_quota()
        .expect("store reads")
        .expect("quota present")
}

pub(super) struct UnavailableStore;

impl CandidateStore for UnavailableStore {
    fn pending_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_new(&self, _candidates: &[Candidate]) -> Result<Vec<CandidateId>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn persist_decision(
        &self,
        _candidate: &Candidate,
        _quota: &QuotaRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_fit_scores(&self, _updates: &[ScoreUpdate]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn load_quota(&self) -> Result<Option<QuotaRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Reads succeed, decision writes fail, so retry semantics can be asserted.
pub(super) struct FailingDecisionStore {
    pub(super) inner: InMemoryCandidateStore,
}

impl CandidateStore for FailingDecisionStore {
    fn pending_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        self.inner.pending_candidates()
    }

    fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        self.inner.all_candidates()
    }

    fn insert_new(&self, candidates: &[Candidate]) -> Result<Vec<CandidateId>, StoreError> {
        self.inner.insert_new(candidates)
    }

    fn persist_decision(
        &self,
        _candidate: &Candidate,
        _quota: &QuotaRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("write timed out".to_string()))
    }

    fn update_fit_scores(&self, updates: &[ScoreUpdate]) -> Result<(), StoreError> {
        self.inner.update_fit_scores(updates)
    }

    fn load_quota(&self) -> Result<Option<QuotaRecord>, StoreError> {
        self.inner.load_quota()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
