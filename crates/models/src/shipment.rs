use serde::{Deserialize, Serialize};

use crate::entity::CyodaEntity;

/// Supplies shipped to a site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub shipment_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl CyodaEntity for Shipment {
    const ENTITY_NAME: &'static str = "shipment";
    const BUSINESS_ID_FIELD: &'static str = "shipmentId";

    fn business_id(&self) -> &str { &self.shipment_id }
}
