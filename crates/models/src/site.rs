use serde::{Deserialize, Serialize};

use crate::entity::CyodaEntity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub site_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub principal_investigator_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CyodaEntity for Site {
    const ENTITY_NAME: &'static str = "site";
    const BUSINESS_ID_FIELD: &'static str = "siteId";

    fn business_id(&self) -> &str { &self.site_id }
}
