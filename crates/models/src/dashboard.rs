use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio-wide metrics served by the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_studies: usize,
    pub active_studies: usize,
    pub studies_by_status: BTreeMap<String, usize>,
    pub total_sites: usize,
    pub total_investigators: usize,
    pub total_subjects_accrued: i64,
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub shipments_by_status: BTreeMap<String, usize>,
    pub generated_at: DateTime<Utc>,
}
