use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId, QuotaRecord};

/// Storage abstraction over the candidate document store so the queue and the
/// rescoring pass can be exercised in isolation.
pub trait CandidateStore: Send + Sync {
    /// All candidates currently awaiting a decision, in no particular order.
    fn pending_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Every stored candidate regardless of status.
    fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Insert newly discovered candidates, skipping ids already known.
    /// Returns the ids that were actually inserted.
    fn insert_new(&self, candidates: &[Candidate]) -> Result<Vec<CandidateId>, StoreError>;

    /// Write a decided candidate and the quota record together. The write is
    /// all-or-nothing: a failure must leave both documents untouched.
    fn persist_decision(&self, candidate: &Candidate, quota: &QuotaRecord)
        -> Result<(), StoreError>;

    /// Apply a batch of fit-score updates atomically; a failure must leave
    /// every candidate at its prior score.
    fn update_fit_scores(&self, updates: &[ScoreUpdate]) -> Result<(), StoreError>;

    /// The per-user quota record, or `None` for a user with no history yet.
    fn load_quota(&self) -> Result<Option<QuotaRecord>, StoreError>;
}

/// One candidate's recomputed score within a rescoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub id: CandidateId,
    pub fit_score: u8,
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for one-time downstream setup, fired on a user's first ever
/// accepted candidate (e.g. provisioning the outreach workspace).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: OutreachAlert) -> Result<(), AlertError>;
}

/// Alert payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachAlert {
    pub template: String,
    pub candidate_id: CandidateId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a candidate as presented by the queue.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub id: CandidateId,
    pub name: String,
    pub status: &'static str,
    pub fit_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&Candidate> for CandidateView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            status: candidate.status.label(),
            fit_score: candidate.fit_score,
            industry: candidate.industry.clone(),
            location: candidate.location.clone(),
        }
    }
}
