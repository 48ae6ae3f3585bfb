use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Candidate, TriageDirection};
use super::queue::{TriageError, TriageQueue};
use super::repository::{AlertPublisher, CandidateStore, CandidateView, StoreError};

type SharedQueue<S, A> = Arc<Mutex<TriageQueue<S, A>>>;

/// Router builder exposing HTTP endpoints for the triage loop.
pub fn triage_router<S, A>(queue: SharedQueue<S, A>) -> Router
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/triage/queue", get(queue_handler::<S, A>))
        .route("/api/v1/triage/decisions", post(decide_handler::<S, A>))
        .route("/api/v1/triage/undo", post(undo_handler::<S, A>))
        .route("/api/v1/triage/refill", post(refill_handler::<S, A>))
        .with_state(queue)
}

#[derive(Debug, Deserialize)]
struct DecisionRequest {
    direction: TriageDirection,
}

#[derive(Debug, Deserialize)]
struct RefillRequest {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
struct QuotaView {
    used_today: u32,
    limit: u32,
    quota_date: chrono::NaiveDate,
}

pub(crate) async fn queue_handler<S, A>(State(queue): State<SharedQueue<S, A>>) -> Response
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    let queue = queue.lock().expect("triage queue mutex poisoned");
    let today = Utc::now().date_naive();

    let payload = json!({
        "state": queue.state(),
        "current": queue.current().map(CandidateView::from),
        "remaining": queue.remaining(),
        "quota": QuotaView {
            used_today: queue.quota().effective_count(today),
            limit: queue.daily_accept_limit(),
            quota_date: today,
        },
    });

    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn decide_handler<S, A>(
    State(queue): State<SharedQueue<S, A>>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    let mut queue = queue.lock().expect("triage queue mutex poisoned");

    match queue.decide(request.direction, Utc::now()) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(TriageError::QuotaExceeded { limit }) => {
            let payload = json!({
                "error": "daily accept limit reached",
                "limit": limit,
                "action": "review_accepted_candidates",
            });
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(payload)).into_response()
        }
        Err(TriageError::NothingPresented) => {
            let payload = json!({
                "error": "no candidate is currently presented",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(TriageError::Store(StoreError::Unavailable(detail))) => {
            let payload = json!({
                "error": format!("store unavailable: {detail}"),
                "action": "retry",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn undo_handler<S, A>(State(queue): State<SharedQueue<S, A>>) -> Response
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    let mut queue = queue.lock().expect("triage queue mutex poisoned");

    match queue.undo() {
        Ok(restored) => {
            let payload = json!({ "restored_candidate_id": restored });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(TriageError::Store(StoreError::Unavailable(detail))) => {
            let payload = json!({
                "error": format!("store unavailable: {detail}"),
                "action": "retry",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn refill_handler<S, A>(
    State(queue): State<SharedQueue<S, A>>,
    axum::Json(request): axum::Json<RefillRequest>,
) -> Response
where
    S: CandidateStore + 'static,
    A: AlertPublisher + 'static,
{
    let mut queue = queue.lock().expect("triage queue mutex poisoned");

    match queue.refill(request.candidates) {
        Ok(added) => {
            let payload = json!({
                "added": added,
                "remaining": queue.remaining(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(TriageError::Store(StoreError::Unavailable(detail))) => {
            let payload = json!({
                "error": format!("store unavailable: {detail}"),
                "action": "retry",
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
