use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static ENTITY_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clinops_entity_operations_total",
        "Entity operations forwarded to the entity platform",
        &["entity", "operation"]
    )
    .expect("register entity_operations_total")
});

pub static DASHBOARD_CACHE_HITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinops_dashboard_cache_hits_total",
        "Dashboard summary reads served from cache"
    )
    .expect("register dashboard_cache_hits_total")
});

pub static DASHBOARD_RECOMPUTE_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinops_dashboard_recompute_total",
        "Dashboard summary computations"
    )
    .expect("register dashboard_recompute_total")
});

pub static DASHBOARD_INVALIDATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinops_dashboard_invalidations_total",
        "Manual dashboard cache invalidations"
    )
    .expect("register dashboard_invalidations_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("metrics encode error: {e}"))?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
