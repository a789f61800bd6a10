use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{require_non_blank, CyodaEntity};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub protocol_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub approved_on: Option<NaiveDate>,
}

impl CyodaEntity for Protocol {
    const ENTITY_NAME: &'static str = "protocol";
    const BUSINESS_ID_FIELD: &'static str = "protocolId";

    fn business_id(&self) -> &str { &self.protocol_id }

    fn validate(&self) -> Result<(), ModelError> {
        require_non_blank(Self::BUSINESS_ID_FIELD, &self.protocol_id)?;
        if let Some(study_id) = &self.study_id {
            require_non_blank("studyId", study_id)?;
        }
        Ok(())
    }
}
