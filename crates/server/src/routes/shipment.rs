use axum::{
    extract::{Path, State},
    Json,
};
use models::{shipment::Shipment, EntityWithMetadata};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

/// `PUT /shipment/{shipmentId}/status/{status}`
pub async fn update_status(
    State(state): State<AppState>,
    Path((shipment_id, status)): Path<(String, String)>,
) -> Result<Json<EntityWithMetadata<Shipment>>, ApiError> {
    info!(%shipment_id, %status, "shipment_status_request");
    state
        .shipments
        .update_status(&shipment_id, &status)
        .await
        .map(Json)
        .map_err(ApiError::entity)
}
