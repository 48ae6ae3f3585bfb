use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use super::provider::{EnrichmentProvider, EnrichmentRequest, EntityDescriptor};
use super::store::{EnrichmentRecord, EnrichmentStore};
use crate::workflows::triage::repository::StoreError;

/// Three-outcome result of a cache lookup. Degraded outcomes are data the
/// caller may still show, labeled so the UI can flag it as possibly outdated.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Served from a fetch within the staleness window, or just refreshed.
    Fresh(EnrichmentRecord),
    /// Provider failed; the previously cached record is served unchanged.
    StaleFallback(EnrichmentRecord),
    /// Provider failed and nothing was ever cached; only locally-known
    /// fields are available.
    ColdFallback(EntityDescriptor),
}

impl EnrichmentOutcome {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, EnrichmentOutcome::Fresh(_))
    }

    pub fn record(&self) -> Option<&EnrichmentRecord> {
        match self {
            EnrichmentOutcome::Fresh(record) | EnrichmentOutcome::StaleFallback(record) => {
                Some(record)
            }
            EnrichmentOutcome::ColdFallback(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.record().map(|record| &record.payload)
    }
}

/// Serves enrichment data for an entity, reusing cached records inside the
/// staleness window and degrading instead of failing when the provider is
/// unavailable. Performs at most one provider call per `get`; concurrent
/// callers are not deduplicated.
pub struct EnrichmentCache<S, P> {
    store: Arc<S>,
    provider: Arc<P>,
}

impl<S, P> EnrichmentCache<S, P>
where
    S: EnrichmentStore + 'static,
    P: EnrichmentProvider + 'static,
{
    pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
        Self { store, provider }
    }

    /// Look up enrichment data for `entity`, refreshing through the provider
    /// when the cached record is older than `staleness`. Store failures
    /// propagate (retryable); provider failures never do.
    pub fn get(
        &self,
        entity: &EntityDescriptor,
        staleness: Duration,
        now: DateTime<Utc>,
    ) -> Result<EnrichmentOutcome, StoreError> {
        let existing = self.store.fetch_record(&entity.entity_id)?;

        if let Some(record) = &existing {
            if now - record.fetched_at < staleness {
                return Ok(EnrichmentOutcome::Fresh(record.clone()));
            }
        }

        let known_source_id = existing.as_ref().and_then(|record| record.source_id.clone());
        let request = EnrichmentRequest::for_entity(entity, known_source_id.clone());

        match self.provider.enrich(&request) {
            Ok(payload) => {
                let record = EnrichmentRecord {
                    entity_id: entity.entity_id.clone(),
                    kind: entity.kind,
                    payload: payload.data,
                    fetched_at: now,
                    source_id: payload.source_id.or(known_source_id),
                };

                // Only a strictly newer fetch may replace the stored payload.
                let newer = existing
                    .as_ref()
                    .map_or(true, |prior| record.fetched_at > prior.fetched_at);
                if newer {
                    self.store.save_record(&record)?;
                }

                Ok(EnrichmentOutcome::Fresh(record))
            }
            Err(err) => match existing {
                Some(record) => {
                    warn!(
                        entity = %entity.entity_id.0,
                        error = %err,
                        "enrichment refresh failed, serving cached record"
                    );
                    Ok(EnrichmentOutcome::StaleFallback(record))
                }
                None => {
                    warn!(
                        entity = %entity.entity_id.0,
                        error = %err,
                        "enrichment fetch failed with empty cache, serving local fields"
                    );
                    Ok(EnrichmentOutcome::ColdFallback(entity.clone()))
                }
            },
        }
    }
}
