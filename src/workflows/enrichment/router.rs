use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::json;

use super::cache::{EnrichmentCache, EnrichmentOutcome};
use super::provider::{EnrichmentProvider, EntityDescriptor, EntityId, EntityKind};
use super::store::EnrichmentStore;
use crate::config::EnrichmentConfig;
use crate::workflows::triage::repository::{CandidateStore, StoreError};

/// Shared state for the enrichment endpoints: the cache plus the candidate
/// store used to resolve locally-known identity fields.
pub struct EnrichmentRouterState<C, S, P> {
    pub candidates: Arc<C>,
    pub cache: EnrichmentCache<S, P>,
    pub staleness: Duration,
}

/// Router builder for on-demand company enrichment.
pub fn enrichment_router<C, S, P>(
    candidates: Arc<C>,
    cache: EnrichmentCache<S, P>,
    config: EnrichmentConfig,
) -> Router
where
    C: CandidateStore + 'static,
    S: EnrichmentStore + 'static,
    P: EnrichmentProvider + 'static,
{
    let state = Arc::new(EnrichmentRouterState {
        candidates,
        cache,
        staleness: config.staleness(),
    });

    Router::new()
        .route(
            "/api/v1/prospects/:candidate_id/enrichment",
            get(enrichment_handler::<C, S, P>),
        )
        .with_state(state)
}

pub(crate) async fn enrichment_handler<C, S, P>(
    State(state): State<Arc<EnrichmentRouterState<C, S, P>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateStore + 'static,
    S: EnrichmentStore + 'static,
    P: EnrichmentProvider + 'static,
{
    let candidate = match state.candidates.all_candidates() {
        Ok(candidates) => candidates
            .into_iter()
            .find(|candidate| candidate.id.0 == candidate_id),
        Err(err) => return store_error_response(err),
    };

    let candidate = match candidate {
        Some(candidate) => candidate,
        None => {
            let payload = json!({ "error": "unknown candidate" });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    let entity = EntityDescriptor {
        entity_id: EntityId(candidate.id.0.clone()),
        kind: EntityKind::Company,
        name: candidate.name.clone(),
        domain: candidate.domain.clone(),
    };

    match state.cache.get(&entity, state.staleness, Utc::now()) {
        Ok(outcome) => {
            let payload = match &outcome {
                EnrichmentOutcome::Fresh(record) | EnrichmentOutcome::StaleFallback(record) => {
                    json!({
                        "entity_id": record.entity_id.0,
                        "degraded": outcome.is_degraded(),
                        "fetched_at": record.fetched_at,
                        "payload": record.payload,
                    })
                }
                EnrichmentOutcome::ColdFallback(descriptor) => json!({
                    "entity_id": descriptor.entity_id.0,
                    "degraded": true,
                    "name": descriptor.name,
                    "domain": descriptor.domain,
                }),
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

fn store_error_response(err: StoreError) -> Response {
    let payload = json!({
        "error": err.to_string(),
        "action": "retry",
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}
