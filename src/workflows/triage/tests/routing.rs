use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::TriageConfig;
use crate::workflows::triage::router::triage_router;

fn triage_app(scores: &[(&str, u8)], config: TriageConfig) -> Router {
    let (queue, _store, _alerts) = seeded_queue(scores, config);
    triage_router(Arc::new(Mutex::new(queue)))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds")
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds")
}

async fn post_empty(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds")
}

#[tokio::test]
async fn queue_endpoint_reports_current_candidate_and_quota() {
    let app = triage_app(&[("top", 90), ("mid", 70)], config_with_limit(25));

    let response = get(&app, "/api/v1/triage/queue").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["state"]["state"], "presenting");
    assert_eq!(body["current"]["id"], "top");
    assert_eq!(body["remaining"], 2);
    assert_eq!(body["quota"]["limit"], 25);
    assert_eq!(body["quota"]["used_today"], 0);
}

#[tokio::test]
async fn decide_endpoint_returns_a_receipt() {
    let app = triage_app(&[("top", 90), ("mid", 70)], config_with_limit(25));

    let response = post_json(
        &app,
        "/api/v1/triage/decisions",
        json!({ "direction": "accept" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["candidate_id"], "top");
    assert_eq!(body["direction"], "accept");
    assert_eq!(body["accepts_remaining_today"], 24);
}

#[tokio::test]
async fn quota_exhaustion_maps_to_too_many_requests() {
    let app = triage_app(&[("top", 90), ("mid", 70)], config_with_limit(1));

    let first = post_json(
        &app,
        "/api/v1/triage/decisions",
        json!({ "direction": "accept" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(
        &app,
        "/api/v1/triage/decisions",
        json!({ "direction": "accept" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = read_json_body(second).await;
    assert_eq!(body["limit"], 1);
    assert_eq!(body["action"], "review_accepted_candidates");
}

#[tokio::test]
async fn deciding_with_nothing_presented_conflicts() {
    let app = triage_app(&[], config_with_limit(25));

    let response = post_json(
        &app,
        "/api/v1/triage/decisions",
        json!({ "direction": "reject" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn undo_endpoint_round_trips_the_last_decision() {
    let app = triage_app(&[("top", 90)], config_with_limit(25));

    post_json(
        &app,
        "/api/v1/triage/decisions",
        json!({ "direction": "accept" }),
    )
    .await;

    let response = post_empty(&app, "/api/v1/triage/undo").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["restored_candidate_id"], "top");

    // Slot is single-use; the second undo is a no-op.
    let response = post_empty(&app, "/api/v1/triage/undo").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["restored_candidate_id"], Value::Null);
}

#[tokio::test]
async fn refill_endpoint_appends_unknown_candidates() {
    let app = triage_app(&[("top", 90)], config_with_limit(25));

    let fresh = scored_candidate("fresh", 60);
    let duplicate = scored_candidate("top", 95);
    let response = post_json(
        &app,
        "/api/v1/triage/refill",
        json!({ "candidates": [fresh, duplicate] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["added"], 1);
    assert_eq!(body["remaining"], 2);
}
