//! Dashboard aggregation with a single-entry TTL cache.
//!
//! Reads are served from the cache until the entry expires; the next read
//! recomputes lazily. Concurrent misses share one computation, so only one
//! summary is visible per cache window. `invalidate` bumps a generation
//! counter that keys the cache, which keeps a computation started before the
//! invalidation from being served afterwards.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use models::{
    accrual::Accrual, dashboard::DashboardSummary, investigator::Investigator, payment::Payment,
    shipment::Shipment, site::Site, study::Study,
};
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::entity_client::{repository::EntityRepository, EntityService};
use crate::errors::ServiceError;
use crate::observability::{DASHBOARD_CACHE_HITS_TOTAL, DASHBOARD_INVALIDATIONS_TOTAL, DASHBOARD_RECOMPUTE_TOTAL};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[async_trait]
pub trait DashboardAggregator: Send + Sync {
    async fn compute(&self) -> Result<DashboardSummary, ServiceError>;
}

/// Computes the summary from the entities held by the platform.
pub struct EntityDashboardAggregator {
    client: Arc<dyn EntityService>,
}

impl EntityDashboardAggregator {
    pub fn new(client: Arc<dyn EntityService>) -> Self {
        Self { client }
    }

    fn repo<T: models::CyodaEntity>(&self) -> EntityRepository<T> {
        EntityRepository::new(Arc::clone(&self.client))
    }
}

fn count_by_status<'a>(statuses: impl Iterator<Item = Option<&'a str>>) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for s in statuses {
        let key = s.map(str::to_uppercase).unwrap_or_else(|| "UNKNOWN".to_string());
        *out.entry(key).or_insert(0) += 1;
    }
    out
}

#[async_trait]
impl DashboardAggregator for EntityDashboardAggregator {
    async fn compute(&self) -> Result<DashboardSummary, ServiceError> {
        let (studies, sites, investigators) = (self.repo::<Study>(), self.repo::<Site>(), self.repo::<Investigator>());
        let (accruals, payments, shipments) = (self.repo::<Accrual>(), self.repo::<Payment>(), self.repo::<Shipment>());
        let (studies, sites, investigators, accruals, payments, shipments) = tokio::try_join!(
            studies.list(),
            sites.list(),
            investigators.list(),
            accruals.list(),
            payments.list(),
            shipments.list(),
        )?;

        let (mut total_paid, mut total_pending) = (Decimal::ZERO, Decimal::ZERO);
        for p in payments.iter().map(|p| &p.entity) {
            let amount = p.amount.unwrap_or(Decimal::ZERO);
            if p.is_paid() {
                total_paid += amount;
            } else {
                total_pending += amount;
            }
        }

        Ok(DashboardSummary {
            total_studies: studies.len(),
            active_studies: studies.iter().filter(|s| s.entity.is_active()).count(),
            studies_by_status: count_by_status(studies.iter().map(|s| s.entity.status.as_deref())),
            total_sites: sites.len(),
            total_investigators: investigators.len(),
            total_subjects_accrued: accruals.iter().filter_map(|a| a.entity.subject_count).sum(),
            total_paid,
            total_pending,
            shipments_by_status: count_by_status(shipments.iter().map(|s| s.entity.status.as_deref())),
            generated_at: Utc::now(),
        })
    }
}

pub struct DashboardService {
    aggregator: Arc<dyn DashboardAggregator>,
    cache: Cache<u64, Arc<DashboardSummary>>,
    generation: AtomicU64,
}

impl DashboardService {
    pub fn new(aggregator: Arc<dyn DashboardAggregator>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(4).time_to_live(ttl).build();
        Self { aggregator, cache, generation: AtomicU64::new(0) }
    }

    /// Cached summary, recomputed when the current entry expired or was invalidated.
    pub async fn summary(&self) -> Result<Arc<DashboardSummary>, ServiceError> {
        let generation = self.generation.load(Ordering::Acquire);
        if let Some(hit) = self.cache.get(&generation).await {
            DASHBOARD_CACHE_HITS_TOTAL.inc();
            return Ok(hit);
        }
        let aggregator = Arc::clone(&self.aggregator);
        self.cache
            .try_get_with(generation, async move {
                DASHBOARD_RECOMPUTE_TOTAL.inc();
                debug!(generation, "dashboard_recompute");
                aggregator.compute().await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    #[instrument(skip(self))]
    pub async fn invalidate(&self) {
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
        DASHBOARD_INVALIDATIONS_TOTAL.inc();
        info!(generation = previous + 1, "dashboard_cache_invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_client::memory::InMemoryEntityService;
    use crate::entity_client::mock::FailingEntityService;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingAggregator {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DashboardAggregator for CountingAggregator {
        async fn compute(&self) -> Result<DashboardSummary, ServiceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(ServiceError::Unavailable("aggregator down".into()));
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(DashboardSummary {
                total_studies: n,
                active_studies: 0,
                studies_by_status: BTreeMap::new(),
                total_sites: 0,
                total_investigators: 0,
                total_subjects_accrued: 0,
                total_paid: Decimal::ZERO,
                total_pending: Decimal::ZERO,
                shipments_by_status: BTreeMap::new(),
                generated_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn reads_within_ttl_are_identical() {
        let agg = Arc::new(CountingAggregator::default());
        let svc = DashboardService::new(agg.clone(), DEFAULT_CACHE_TTL);
        let a = svc.summary().await.unwrap();
        let b = svc.summary().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(agg.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute() {
        let agg = Arc::new(CountingAggregator::default());
        let svc = DashboardService::new(agg.clone(), DEFAULT_CACHE_TTL);
        let first = svc.summary().await.unwrap();
        svc.invalidate().await;
        let second = svc.summary().await.unwrap();
        assert_eq!(agg.calls.load(Ordering::SeqCst), 2);
        assert_ne!(first.total_studies, second.total_studies);
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() {
        let agg = Arc::new(CountingAggregator::default());
        let svc = DashboardService::new(agg.clone(), Duration::from_millis(50));
        svc.summary().await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        svc.summary().await.unwrap();
        assert_eq!(agg.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_computation() {
        let agg = Arc::new(CountingAggregator::default());
        let svc = Arc::new(DashboardService::new(agg.clone(), DEFAULT_CACHE_TTL));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.summary().await.map(|s| s.total_studies) })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), 1);
        }
        assert_eq!(agg.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let agg = Arc::new(CountingAggregator { calls: AtomicUsize::new(0), fail: true });
        let svc = DashboardService::new(agg.clone(), DEFAULT_CACHE_TTL);
        assert!(matches!(svc.summary().await, Err(ServiceError::Unavailable(_))));
        assert!(svc.summary().await.is_err());
        assert_eq!(agg.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn entity_aggregator_summarises_platform_data() {
        let client = InMemoryEntityService::with_descriptors(&models::registry::descriptors());
        let studies = EntityRepository::<Study>::new(client.clone());
        let payments = EntityRepository::<Payment>::new(client.clone());
        let accruals = EntityRepository::<Accrual>::new(client.clone());
        let shipments = EntityRepository::<Shipment>::new(client.clone());

        for (id, status) in [("ST-1", "ACTIVE"), ("ST-2", "CLOSED"), ("ST-3", "active")] {
            studies
                .create(serde_json::from_value(serde_json::json!({"studyId": id, "status": status})).unwrap())
                .await
                .unwrap();
        }
        for (id, amount, status) in [("P-1", "100.50", "PAID"), ("P-2", "20", "PENDING"), ("P-3", "5", "paid")] {
            payments
                .create(serde_json::from_value(serde_json::json!({"paymentId": id, "amount": amount, "status": status})).unwrap())
                .await
                .unwrap();
        }
        for (id, n) in [("A-1", 3), ("A-2", 7)] {
            accruals
                .create(serde_json::from_value(serde_json::json!({"accrualId": id, "subjectCount": n})).unwrap())
                .await
                .unwrap();
        }
        shipments
            .create(serde_json::from_value(serde_json::json!({"shipmentId": "SH-1", "status": "SENT"})).unwrap())
            .await
            .unwrap();
        shipments
            .create(serde_json::from_value(serde_json::json!({"shipmentId": "SH-2"})).unwrap())
            .await
            .unwrap();

        let summary = EntityDashboardAggregator::new(client).compute().await.unwrap();
        assert_eq!(summary.total_studies, 3);
        assert_eq!(summary.active_studies, 2);
        assert_eq!(summary.studies_by_status.get("ACTIVE"), Some(&2));
        assert_eq!(summary.total_subjects_accrued, 10);
        assert_eq!(summary.total_paid, Decimal::new(10550, 2));
        assert_eq!(summary.total_pending, Decimal::from(20));
        assert_eq!(summary.shipments_by_status.get("SENT"), Some(&1));
        assert_eq!(summary.shipments_by_status.get("UNKNOWN"), Some(&1));
        assert_eq!(summary.total_sites, 0);
    }

    #[tokio::test]
    async fn entity_aggregator_surfaces_unavailable_platform() {
        let agg = EntityDashboardAggregator::new(Arc::new(FailingEntityService { unavailable: true }));
        assert!(matches!(agg.compute().await, Err(ServiceError::Unavailable(_))));
    }
}
