//! Daily triage of scored candidates: one swipe at a time, quota enforced,
//! one level of undo.

pub mod domain;
pub mod queue;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{Candidate, CandidateId, CandidateStatus, QuotaRecord, TriageDirection};
pub use queue::{DecisionReceipt, TriageError, TriageQueue, TriageState};
pub use repository::{
    AlertError, AlertPublisher, CandidateStore, CandidateView, OutreachAlert, ScoreUpdate,
    StoreError,
};
pub use router::triage_router;
