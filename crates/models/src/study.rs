use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::CyodaEntity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub study_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_enrollment: Option<u32>,
}

impl Study {
    /// A study counts as active unless it has been closed or completed.
    pub fn is_active(&self) -> bool {
        match self.status.as_deref() {
            Some(s) => !matches!(s.to_ascii_uppercase().as_str(), "CLOSED" | "COMPLETED" | "TERMINATED"),
            None => true,
        }
    }
}

impl CyodaEntity for Study {
    const ENTITY_NAME: &'static str = "study";
    const BUSINESS_ID_FIELD: &'static str = "studyId";

    fn business_id(&self) -> &str { &self.study_id }
}
