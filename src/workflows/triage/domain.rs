use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned identifier for a candidate company, stable across
/// imports and used for dedup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// A company under triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub employee_size_range: Option<String>,
    pub revenue_range: Option<String>,
    pub status: CandidateStatus,
    pub fit_score: u8,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Fresh pending candidate as produced by discovery or a sourcing import.
    pub fn pending(id: CandidateId, name: String) -> Self {
        Self {
            id,
            name,
            domain: None,
            industry: None,
            location: None,
            employee_size_range: None,
            revenue_range: None,
            status: CandidateStatus::Pending,
            fit_score: 0,
            decided_at: None,
        }
    }
}

/// Triage status of a candidate. Archival only applies to accepted
/// candidates and removes them from the triage queue's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Accepted,
    Rejected,
    Archived,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::Accepted => "accepted",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Archived => "archived",
        }
    }
}

/// Which way the user swiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageDirection {
    Accept,
    Reject,
}

/// Persisted per-user quota state. The stored count belongs to `quota_date`;
/// a new calendar day makes the effective count 0 without touching the stored
/// values until the next decision writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub daily_accept_count: u32,
    pub quota_date: NaiveDate,
    pub has_seen_followup_prompt: bool,
}

impl QuotaRecord {
    /// Starting record for a user with no triage history.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            daily_accept_count: 0,
            quota_date: today,
            has_seen_followup_prompt: false,
        }
    }

    /// Accept count that applies to `today` in the single reference timezone.
    pub fn effective_count(&self, today: NaiveDate) -> u32 {
        if self.quota_date == today {
            self.daily_accept_count
        } else {
            0
        }
    }
}
