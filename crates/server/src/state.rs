use std::sync::Arc;
use std::time::Duration;

use models::CyodaEntity;
use service::dashboard::{DashboardService, EntityDashboardAggregator};
use service::entity_client::{repository::EntityRepository, EntityService};
use service::shipment::ShipmentService;

/// Shared handler state; every collaborator is injected here.
#[derive(Clone)]
pub struct AppState {
    pub entities: Arc<dyn EntityService>,
    pub shipments: Arc<ShipmentService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    /// Wire the shipment and dashboard services on top of one entity client.
    pub fn new(entities: Arc<dyn EntityService>, cache_ttl: Duration) -> Self {
        let aggregator = Arc::new(EntityDashboardAggregator::new(Arc::clone(&entities)));
        let dashboard = Arc::new(DashboardService::new(aggregator, cache_ttl));
        Self::with_dashboard(entities, dashboard)
    }

    pub fn with_dashboard(entities: Arc<dyn EntityService>, dashboard: Arc<DashboardService>) -> Self {
        let shipments = Arc::new(ShipmentService::new(Arc::clone(&entities)));
        Self { entities, shipments, dashboard }
    }

    pub fn repo<T: CyodaEntity>(&self) -> EntityRepository<T> {
        EntityRepository::new(Arc::clone(&self.entities))
    }
}
