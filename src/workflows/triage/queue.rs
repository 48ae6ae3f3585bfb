use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{Candidate, CandidateId, CandidateStatus, QuotaRecord, TriageDirection};
use super::repository::{AlertError, AlertPublisher, CandidateStore, OutreachAlert, StoreError};
use crate::config::TriageConfig;

/// Where the queue currently stands for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "candidate_id", rename_all = "snake_case")]
pub enum TriageState {
    Idle,
    Presenting(CandidateId),
    Exhausted,
}

/// Caller-facing summary of a committed decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionReceipt {
    pub candidate_id: CandidateId,
    pub direction: TriageDirection,
    pub accepts_remaining_today: u32,
}

/// Error raised by queue operations.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("no candidate is currently presented")]
    NothingPresented,
    #[error("daily accept limit of {limit} reached")]
    QuotaExceeded { limit: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}

/// The single-level undo slot: the presented candidate's prior snapshot plus
/// the quota values to restore verbatim.
#[derive(Debug, Clone)]
struct UndoSlot {
    candidate: Candidate,
    position: usize,
    prev_accept_count: u32,
    prev_quota_date: NaiveDate,
}

/// Presents one pending candidate at a time, enforces the daily accept quota,
/// and supports exactly one level of undo. Callers serialize access (one
/// decision in flight per user); the queue itself holds no locks.
pub struct TriageQueue<S, A> {
    store: Arc<S>,
    alerts: Arc<A>,
    config: TriageConfig,
    entries: Vec<Candidate>,
    cursor: usize,
    undo: Option<UndoSlot>,
    quota: QuotaRecord,
    known: HashSet<CandidateId>,
}

impl<S, A> TriageQueue<S, A>
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    /// Load the pending backlog and quota record and start presenting from
    /// the highest-scored candidate.
    pub fn open(
        store: Arc<S>,
        alerts: Arc<A>,
        config: TriageConfig,
        today: NaiveDate,
    ) -> Result<Self, TriageError> {
        let mut entries = store.pending_candidates()?;
        entries.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));

        let quota = store
            .load_quota()?
            .unwrap_or_else(|| QuotaRecord::initial(today));

        let known = entries.iter().map(|candidate| candidate.id.clone()).collect();

        Ok(Self {
            store,
            alerts,
            config,
            entries,
            cursor: 0,
            undo: None,
            quota,
            known,
        })
    }

    pub fn state(&self) -> TriageState {
        match self.entries.get(self.cursor) {
            Some(candidate) => TriageState::Presenting(candidate.id.clone()),
            None if self.known.is_empty() => TriageState::Idle,
            None => TriageState::Exhausted,
        }
    }

    /// The candidate currently presented for a decision.
    pub fn current(&self) -> Option<&Candidate> {
        self.entries.get(self.cursor)
    }

    /// How many pending candidates remain, including the presented one.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    pub fn quota(&self) -> &QuotaRecord {
        &self.quota
    }

    pub fn daily_accept_limit(&self) -> u32 {
        self.config.daily_accept_limit
    }

    /// Accepts still available today under the configured limit.
    pub fn accepts_remaining(&self, today: NaiveDate) -> u32 {
        self.config
            .daily_accept_limit
            .saturating_sub(self.quota.effective_count(today))
    }

    /// Commit an accept/reject for the presented candidate.
    ///
    /// Accepts beyond the daily limit fail with `QuotaExceeded` and mutate
    /// nothing; the caller is expected to stop presenting accepts and steer
    /// the user toward reviewing already-accepted candidates. A store failure
    /// also mutates nothing so the same candidate can be retried.
    pub fn decide(
        &mut self,
        direction: TriageDirection,
        now: DateTime<Utc>,
    ) -> Result<DecisionReceipt, TriageError> {
        let presented = self
            .entries
            .get(self.cursor)
            .ok_or(TriageError::NothingPresented)?
            .clone();
        let today = now.date_naive();

        if direction == TriageDirection::Accept
            && self.quota.effective_count(today) >= self.config.daily_accept_limit
        {
            return Err(TriageError::QuotaExceeded {
                limit: self.config.daily_accept_limit,
            });
        }

        let mut decided = presented.clone();
        decided.status = match direction {
            TriageDirection::Accept => CandidateStatus::Accepted,
            TriageDirection::Reject => CandidateStatus::Rejected,
        };
        decided.decided_at = Some(now);

        let mut quota = self.quota;
        let mut first_accept = false;
        if direction == TriageDirection::Accept {
            quota.daily_accept_count = quota.effective_count(today) + 1;
            quota.quota_date = today;
            first_accept = !quota.has_seen_followup_prompt;
            quota.has_seen_followup_prompt = true;
        }

        self.store.persist_decision(&decided, &quota)?;

        self.undo = Some(UndoSlot {
            candidate: presented,
            position: self.cursor,
            prev_accept_count: self.quota.daily_accept_count,
            prev_quota_date: self.quota.quota_date,
        });
        self.entries.remove(self.cursor);
        if self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
        self.quota = quota;

        if first_accept {
            info!(candidate = %decided.id.0, "first accepted candidate, publishing bootstrap alert");
            let mut details = BTreeMap::new();
            details.insert("candidate_name".to_string(), decided.name.clone());
            self.alerts.publish(OutreachAlert {
                template: "first_candidate_accepted".to_string(),
                candidate_id: decided.id.clone(),
                details,
            })?;
        }

        Ok(DecisionReceipt {
            candidate_id: decided.id,
            direction,
            accepts_remaining_today: self.accepts_remaining(today),
        })
    }

    /// Revert the most recent decision, restoring the candidate to pending
    /// and the quota values verbatim. A no-op when no decision is held;
    /// returns the restored candidate id otherwise.
    ///
    /// The followup-prompt flag survives undo so redoing a first accept
    /// cannot refire the one-time bootstrap alert.
    pub fn undo(&mut self) -> Result<Option<CandidateId>, TriageError> {
        let slot = match self.undo.take() {
            Some(slot) => slot,
            None => return Ok(None),
        };

        let mut restored = slot.candidate.clone();
        restored.status = CandidateStatus::Pending;
        restored.decided_at = None;

        let quota = QuotaRecord {
            daily_accept_count: slot.prev_accept_count,
            quota_date: slot.prev_quota_date,
            has_seen_followup_prompt: self.quota.has_seen_followup_prompt,
        };

        if let Err(err) = self.store.persist_decision(&restored, &quota) {
            self.undo = Some(slot);
            return Err(err.into());
        }

        let position = slot.position.min(self.entries.len());
        let id = restored.id.clone();
        self.entries.insert(position, restored);
        self.cursor = position;
        self.quota = quota;

        Ok(Some(id))
    }

    /// Append newly discovered candidates, dedup by id against everything the
    /// queue has seen, and re-sort the pending set by fit score descending
    /// (stable, so equal scores keep insertion order). The cursor returns to
    /// the front only when the queue had nothing left to present; otherwise
    /// the presented candidate is retained. A store failure leaves the queue
    /// untouched. Returns how many candidates were added.
    pub fn refill(&mut self, candidates: Vec<Candidate>) -> Result<usize, TriageError> {
        let mut fresh = Vec::new();
        let mut batch_ids = HashSet::new();
        for candidate in candidates {
            if candidate.status != CandidateStatus::Pending {
                continue;
            }
            if self.known.contains(&candidate.id) || !batch_ids.insert(candidate.id.clone()) {
                continue;
            }
            fresh.push(candidate);
        }

        if fresh.is_empty() {
            return Ok(0);
        }

        let inserted = self.store.insert_new(&fresh)?;
        let inserted: HashSet<CandidateId> = inserted.into_iter().collect();

        let presented = self.entries.get(self.cursor).map(|candidate| candidate.id.clone());

        let mut added = 0;
        for candidate in fresh {
            if !inserted.contains(&candidate.id) {
                continue;
            }
            self.known.insert(candidate.id.clone());
            self.entries.push(candidate);
            added += 1;
        }
        self.entries.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));

        self.cursor = match presented {
            Some(id) => self
                .entries
                .iter()
                .position(|candidate| candidate.id == id)
                .unwrap_or(0),
            None => 0,
        };

        Ok(added)
    }
}
