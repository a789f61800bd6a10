//! Shipment status changes driven through platform workflow transitions.

use std::sync::Arc;

use models::{shipment::Shipment, EntityWithMetadata};
use tracing::{info, instrument, warn};

use crate::entity_client::{repository::EntityRepository, EntityService};
use crate::errors::ServiceError;

/// Lower-cased status → workflow transition.
const STATUS_TRANSITIONS: &[(&str, &str)] = &[
    ("waiting_to_send", "ready_to_send"),
    ("sent", "mark_sent"),
    ("delivered", "mark_delivered"),
];

pub fn transition_for_status(status: &str) -> Option<&'static str> {
    let key = status.to_lowercase();
    STATUS_TRANSITIONS
        .iter()
        .find(|(s, _)| *s == key)
        .map(|(_, t)| *t)
}

pub struct ShipmentService {
    repo: EntityRepository<Shipment>,
}

impl ShipmentService {
    pub fn new(client: Arc<dyn EntityService>) -> Self {
        Self { repo: EntityRepository::new(client) }
    }

    /// Move a shipment to `status`; unknown statuses are rejected before the
    /// platform is contacted.
    #[instrument(skip(self))]
    pub async fn update_status(&self, shipment_id: &str, status: &str) -> Result<EntityWithMetadata<Shipment>, ServiceError> {
        let Some(transition) = transition_for_status(status) else {
            warn!(%status, "shipment_status_unrecognized");
            return Err(ServiceError::InvalidTransition(format!("unsupported shipment status: {status}")));
        };

        let current = self
            .repo
            .get_by_business_id(shipment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("shipment {shipment_id} not found")))?;

        let mut shipment = current.entity;
        shipment.status = Some(status.to_uppercase());
        let updated = self.repo.update(current.meta.id, shipment, Some(transition)).await?;
        info!(%transition, state = %updated.meta.state, "shipment_status_updated");
        Ok(updated)
    }
}
