use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::dashboard::DEFAULT_CACHE_TTL;
use service::entity_client::memory::InMemoryEntityService;
use service::entity_client::mock::{Call, FailingEntityService, RecordingEntityService};
use service::entity_client::EntityService;
use tower::Service;
use uuid::Uuid;

use server::startup::build_app;
use server::state::AppState;

fn memory() -> Arc<dyn EntityService> {
    InMemoryEntityService::with_descriptors(&models::registry::descriptors())
}

fn app_with(entities: Arc<dyn EntityService>) -> Router {
    build_app(AppState::new(entities, DEFAULT_CACHE_TTL))
}

fn recorded_app() -> (Arc<RecordingEntityService>, Router) {
    let recorder = Arc::new(RecordingEntityService::new(memory()));
    let app = app_with(recorder.clone());
    (recorder, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn create_then_duplicate_is_a_conflict() -> anyhow::Result<()> {
    let app = app_with(memory());
    let study = json!({"studyId": "ST-100", "title": "Phase II", "status": "ACTIVE"});

    let (status, body) = send(&app, "POST", "/study", Some(study.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entity"]["studyId"], "ST-100");
    assert!(body["meta"]["id"].is_string());

    let (status, body) = send(&app, "POST", "/study", Some(study)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate Entity");
    Ok(())
}

#[tokio::test]
async fn lookups_by_id_and_business_id() -> anyhow::Result<()> {
    let app = app_with(memory());
    let (_, created) = send(&app, "POST", "/site", Some(json!({"siteId": "S-1", "name": "North"}))).await?;
    let id = created["meta"]["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&app, "GET", &format!("/site/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["name"], "North");

    let (status, body) = send(&app, "GET", "/site/business/S-1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["id"], id.as_str());

    let (status, _) = send(&app, "GET", &format!("/site/{}", Uuid::new_v4()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "GET", "/site/business/S-404", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn blank_transition_is_not_forwarded() -> anyhow::Result<()> {
    let (recorder, app) = recorded_app();
    let (_, created) = send(&app, "POST", "/protocol", Some(json!({"protocolId": "PR-1", "studyId": "ST-1"}))).await?;
    let id = created["meta"]["id"].as_str().unwrap_or_default().to_string();

    let payload = json!({"protocolId": "PR-1", "studyId": "ST-1", "title": "v2"});
    let (status, _) = send(&app, "PUT", &format!("/protocol/{id}?transition="), Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "PUT", &format!("/protocol/{id}?transition=approve"), Some(payload)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["lastTransition"], "approve");

    assert_eq!(recorder.transitions(), vec![None, Some("approve".to_string())]);
    Ok(())
}

#[tokio::test]
async fn update_by_business_id_and_missing_target() -> anyhow::Result<()> {
    let app = app_with(memory());
    send(&app, "POST", "/investigator", Some(json!({"investigatorId": "INV-1", "email": "a@b.org"}))).await?;

    let (status, body) = send(
        &app,
        "PUT",
        "/investigator/business/INV-1",
        Some(json!({"investigatorId": "INV-1", "email": "new@b.org"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["email"], "new@b.org");

    let (status, _) = send(&app, "PUT", "/investigator/business/INV-9", Some(json!({"investigatorId": "INV-9"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_and_search() -> anyhow::Result<()> {
    let app = app_with(memory());
    for (id, status) in [("P-1", "PAID"), ("P-2", "PENDING"), ("P-3", "PAID")] {
        let (code, _) = send(&app, "POST", "/payment", Some(json!({"paymentId": id, "amount": "10.00", "status": status}))).await?;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/payment", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let condition = json!({
        "operator": "AND",
        "conditions": [{"field": "status", "operator": "EQUALS", "value": "PAID"}]
    });
    let (status, body) = send(&app, "POST", "/payment/search", Some(condition)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() -> anyhow::Result<()> {
    let app = app_with(memory());
    let (_, created) = send(&app, "POST", "/accrual", Some(json!({"accrualId": "A-1", "subjectCount": 4}))).await?;
    let id = created["meta"]["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/accrual/{id}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/accrual/{id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // every delete failure is reported as a bad request
    let (status, _) = send(&app, "DELETE", &format!("/accrual/{id}"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_and_invalid_bodies_are_bad_requests() -> anyhow::Result<()> {
    let (recorder, app) = recorded_app();
    let req = Request::builder()
        .method("POST")
        .uri("/study")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/accrual", Some(json!({"accrualId": "A-2", "subjectCount": -1}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    assert!(recorder.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn shipment_status_endpoint() -> anyhow::Result<()> {
    let (recorder, app) = recorded_app();
    send(&app, "POST", "/shipment", Some(json!({"shipmentId": "SH-1", "status": "WAITING_TO_SEND"}))).await?;
    recorder.clear();

    let (status, body) = send(&app, "PUT", "/shipment/SH-1/status/sent", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["status"], "SENT");
    assert_eq!(recorder.transitions(), vec![Some("mark_sent".to_string())]);

    recorder.clear();
    let (status, body) = send(&app, "PUT", "/shipment/SH-1/status/unknown", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Transition");
    assert!(recorder.calls().is_empty());

    let (status, _) = send(&app, "PUT", "/shipment/SH-404/status/delivered", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(matches!(recorder.calls().as_slice(), [Call::FindByBusinessId(model, id)] if model == "shipment" && id == "SH-404"));
    Ok(())
}

#[tokio::test]
async fn dashboard_is_cached_until_invalidated() -> anyhow::Result<()> {
    let app = app_with(memory());
    send(&app, "POST", "/study", Some(json!({"studyId": "ST-1", "status": "ACTIVE"}))).await?;

    let (status, first) = send(&app, "GET", "/dashboard/summary", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["totalStudies"], 1);

    send(&app, "POST", "/study", Some(json!({"studyId": "ST-2", "status": "CLOSED"}))).await?;
    let (_, cached) = send(&app, "GET", "/dashboard/summary", None).await?;
    assert_eq!(cached, first);

    let (status, _) = send(&app, "POST", "/dashboard/cache/invalidate", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, fresh) = send(&app, "GET", "/dashboard/summary", None).await?;
    assert_eq!(fresh["totalStudies"], 2);
    assert_eq!(fresh["activeStudies"], 1);
    Ok(())
}

#[tokio::test]
async fn dashboard_failures_map_to_server_errors() -> anyhow::Result<()> {
    let down = build_app(AppState::new(Arc::new(FailingEntityService { unavailable: true }), Duration::from_secs(1)));
    let (status, body) = send(&down, "GET", "/dashboard/summary", None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service Unavailable");

    let broken = build_app(AppState::new(Arc::new(FailingEntityService { unavailable: false }), Duration::from_secs(1)));
    let (status, _) = send(&broken, "GET", "/dashboard/summary", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // entity endpoints report the same outage as a bad request
    let (status, _) = send(&down, "GET", "/study", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn health_and_metrics() -> anyhow::Result<()> {
    let app = app_with(memory());
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    send(&app, "GET", "/study", None).await?;
    let req = Request::builder().uri("/metrics").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await?.to_vec())?;
    assert!(text.contains("entity_operations_total"));
    Ok(())
}
