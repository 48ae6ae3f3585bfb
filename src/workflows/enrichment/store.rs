use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{EntityId, EntityKind};
use crate::workflows::triage::repository::StoreError;

/// Cached third-party data for one entity. The payload is only ever replaced
/// by a strictly newer fetch; records are never deleted automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub entity_id: EntityId,
    pub kind: EntityKind,
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub source_id: Option<String>,
}

/// Storage seam for enrichment records, keyed by entity id.
pub trait EnrichmentStore: Send + Sync {
    fn fetch_record(&self, entity_id: &EntityId) -> Result<Option<EnrichmentRecord>, StoreError>;
    fn save_record(&self, record: &EnrichmentRecord) -> Result<(), StoreError>;
}
