//! Router-level tests for the gateway: request validation, error mapping,
//! and the response contract of `/match`, `/healthz`, and `/ready`.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::audit::{AuditError, Auditor, MockAuditClient, RetryPolicy};
use crate::gateway::{HandlerState, create_router_with_state};
use crate::pipeline::MatchPipeline;
use crate::trialstore::{MockTrialStore, TrialDocument};

fn test_trial(nct_id: &str) -> TrialDocument {
    TrialDocument {
        nct_id: nct_id.to_string(),
        title: format!("Study {}", nct_id),
        phase: "Phase 2".to_string(),
        url: format!("https://clinicaltrials.gov/study/{}", nct_id),
        eligibility_text: "Adults 18-45.".to_string(),
        is_domestic: true,
        score: 0.9,
    }
}

fn test_router(store: MockTrialStore, client: MockAuditClient, top_k: u64) -> Router {
    let auditor = Auditor::new(client, RetryPolicy::fast());
    let pipeline = MatchPipeline::new(Arc::new(store), Arc::new(auditor), top_k);
    create_router_with_state(HandlerState::new(Arc::new(pipeline)))
}

async fn send_match_request(router: &Router, body: serde_json::Value) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/match")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz_returns_ok() {
    let router = test_router(MockTrialStore::new(), MockAuditClient::new(), 4);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ready_reflects_store_availability() {
    let store = MockTrialStore::new();
    store.set_available(false);
    let router = test_router(store, MockAuditClient::new(), 4);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["components"]["trial_store"], "pending");
    assert_eq!(body["components"]["http"], "ready");
}

#[tokio::test]
async fn test_ready_ok_when_store_available() {
    let router = test_router(MockTrialStore::new(), MockAuditClient::new(), 4);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_match_happy_path_preserves_rank_order() {
    let store = MockTrialStore::new();
    store.seed(test_trial("NCT-T1"));
    store.seed(test_trial("NCT-T2"));
    store.seed(test_trial("NCT-T3"));

    let client = MockAuditClient::new();
    client.respond_with("NCT-T1", "ELIGIBLE. Criteria satisfied.");
    client.respond_with("NCT-T2", "NOT-ELIGIBLE. Age excludes.");
    client.respond_with("NCT-T3", "UNCERTAIN. Needs staging.");
    // Reverse the completion order relative to rank.
    client.delay("NCT-T1", Duration::from_millis(80));
    client.delay("NCT-T2", Duration::from_millis(40));

    let router = test_router(store, client, 3);
    let response =
        send_match_request(&router, serde_json::json!({"summary": "35F with pelvic pain"})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["nct_id"], "NCT-T1");
    assert_eq!(matches[1]["nct_id"], "NCT-T2");
    assert_eq!(matches[2]["nct_id"], "NCT-T3");
    assert_eq!(matches[0]["analysis"], "ELIGIBLE. Criteria satisfied.");
    assert_eq!(matches[0]["title"], "Study NCT-T1");
    assert_eq!(matches[0]["phase"], "Phase 2");
    assert_eq!(
        matches[0]["url"],
        "https://clinicaltrials.gov/study/NCT-T1"
    );
}

#[tokio::test]
async fn test_match_with_no_candidates_returns_empty_array() {
    let router = test_router(MockTrialStore::new(), MockAuditClient::new(), 4);

    let response = send_match_request(&router, serde_json::json!({"summary": "rare case"})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["matches"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_empty_summary_is_rejected() {
    let router = test_router(MockTrialStore::new(), MockAuditClient::new(), 4);

    let response = send_match_request(&router, serde_json::json!({"summary": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_match_request(&router, serde_json::json!({"summary": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_summary_field_is_rejected() {
    let router = test_router(MockTrialStore::new(), MockAuditClient::new(), 4);

    let response = send_match_request(&router, serde_json::json!({"patient": "text"})).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unavailable_store_maps_to_500_with_detail() {
    let store = MockTrialStore::new();
    store.seed(test_trial("NCT-T1"));
    store.set_available(false);

    let router = test_router(store, MockAuditClient::new(), 4);
    let response = send_match_request(&router, serde_json::json!({"summary": "case"})).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
    assert!(body.get("matches").is_none());
}

#[tokio::test]
async fn test_failed_audit_is_a_normal_entry_not_an_http_error() {
    let store = MockTrialStore::new();
    store.seed(test_trial("NCT-T1"));
    store.seed(test_trial("NCT-T2"));

    let client = MockAuditClient::new();
    client.respond_with("NCT-T1", "ELIGIBLE.");
    client.fail_with("NCT-T2", AuditError::permanent("401 invalid API key"));

    let router = test_router(store, client, 2);
    let response = send_match_request(&router, serde_json::json!({"summary": "case"})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["analysis"], "ELIGIBLE.");
    let failed_analysis = matches[1]["analysis"].as_str().unwrap();
    assert!(failed_analysis.contains("audit error"));
    assert!(failed_analysis.contains("401 invalid API key"));
}
