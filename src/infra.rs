//! In-memory backing stores used by the binary's default wiring and by the
//! integration tests. A document-store deployment swaps these for real
//! adapters behind the same traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::enrichment::{EnrichmentRecord, EnrichmentStore, EntityId};
use crate::workflows::triage::domain::{Candidate, CandidateId, CandidateStatus, QuotaRecord};
use crate::workflows::triage::repository::{
    AlertError, AlertPublisher, CandidateStore, OutreachAlert, ScoreUpdate, StoreError,
};

#[derive(Default)]
struct CandidateState {
    candidates: HashMap<CandidateId, Candidate>,
    quota: Option<QuotaRecord>,
}

/// Candidate and quota documents behind a single lock so the paired decision
/// write is all-or-nothing.
#[derive(Default, Clone)]
pub struct InMemoryCandidateStore {
    state: Arc<Mutex<CandidateState>>,
}

impl CandidateStore for InMemoryCandidateStore {
    fn pending_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let state = self.state.lock().expect("candidate store mutex poisoned");
        Ok(state
            .candidates
            .values()
            .filter(|candidate| candidate.status == CandidateStatus::Pending)
            .cloned()
            .collect())
    }

    fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let state = self.state.lock().expect("candidate store mutex poisoned");
        Ok(state.candidates.values().cloned().collect())
    }

    fn insert_new(&self, candidates: &[Candidate]) -> Result<Vec<CandidateId>, StoreError> {
        let mut state = self.state.lock().expect("candidate store mutex poisoned");
        let mut inserted = Vec::new();

        for candidate in candidates {
            if state.candidates.contains_key(&candidate.id) {
                continue;
            }
            state
                .candidates
                .insert(candidate.id.clone(), candidate.clone());
            inserted.push(candidate.id.clone());
        }

        Ok(inserted)
    }

    fn persist_decision(
        &self,
        candidate: &Candidate,
        quota: &QuotaRecord,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("candidate store mutex poisoned");
        if !state.candidates.contains_key(&candidate.id) {
            return Err(StoreError::NotFound);
        }

        state
            .candidates
            .insert(candidate.id.clone(), candidate.clone());
        state.quota = Some(*quota);
        Ok(())
    }

    fn update_fit_scores(&self, updates: &[ScoreUpdate]) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("candidate store mutex poisoned");

        // Validate the whole batch before touching anything.
        if updates
            .iter()
            .any(|update| !state.candidates.contains_key(&update.id))
        {
            return Err(StoreError::NotFound);
        }

        for update in updates {
            if let Some(candidate) = state.candidates.get_mut(&update.id) {
                candidate.fit_score = update.fit_score;
            }
        }
        Ok(())
    }

    fn load_quota(&self) -> Result<Option<QuotaRecord>, StoreError> {
        let state = self.state.lock().expect("candidate store mutex poisoned");
        Ok(state.quota)
    }
}

/// Enrichment records keyed by entity id.
#[derive(Default, Clone)]
pub struct InMemoryEnrichmentStore {
    records: Arc<Mutex<HashMap<EntityId, EnrichmentRecord>>>,
}

impl EnrichmentStore for InMemoryEnrichmentStore {
    fn fetch_record(&self, entity_id: &EntityId) -> Result<Option<EnrichmentRecord>, StoreError> {
        let records = self.records.lock().expect("enrichment store mutex poisoned");
        Ok(records.get(entity_id).cloned())
    }

    fn save_record(&self, record: &EnrichmentRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("enrichment store mutex poisoned");
        records.insert(record.entity_id.clone(), record.clone());
        Ok(())
    }
}

/// Captures bootstrap alerts so wiring and tests can assert on them.
#[derive(Default, Clone)]
pub struct RecordingAlertPublisher {
    events: Arc<Mutex<Vec<OutreachAlert>>>,
}

impl RecordingAlertPublisher {
    pub fn events(&self) -> Vec<OutreachAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for RecordingAlertPublisher {
    fn publish(&self, alert: OutreachAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}
