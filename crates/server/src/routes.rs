use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use models::{
    accrual::Accrual, investigator::Investigator, payment::Payment, protocol::Protocol,
    shipment::Shipment, site::Site, study::Study,
};
use service::observability::encode_metrics;

use crate::state::AppState;

pub mod dashboard;
pub mod entity;
pub mod shipment;

pub async fn health() -> Json<Health> {
    Json(Health::ok("server"))
}

pub async fn metrics() -> impl IntoResponse {
    match encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        Err(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
    }
}

/// One CRUD controller per entity type, all from the same generic factory.
fn entity_controllers() -> Router<AppState> {
    Router::new()
        .merge(entity::entity_routes::<Accrual>())
        .merge(entity::entity_routes::<Investigator>())
        .merge(entity::entity_routes::<Payment>())
        .merge(entity::entity_routes::<Protocol>())
        .merge(entity::entity_routes::<Shipment>())
        .merge(entity::entity_routes::<Site>())
        .merge(entity::entity_routes::<Study>())
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // path parameter must share the `:id` name used by the generic shipment routes
    let shipment_status = Router::new()
        .route("/shipment/:id/status/:status", put(shipment::update_status));

    let dashboard = Router::new()
        .route("/dashboard/summary", get(dashboard::summary))
        .route("/dashboard/cache/invalidate", post(dashboard::invalidate_cache));

    ops
        .merge(entity_controllers())
        .merge(shipment_status)
        .merge(dashboard)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
