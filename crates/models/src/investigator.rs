use serde::{Deserialize, Serialize};

use crate::entity::{require_non_blank, CyodaEntity};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigator {
    pub investigator_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ModelError::Validation(format!("invalid email: {email}"))),
    }
}

impl CyodaEntity for Investigator {
    const ENTITY_NAME: &'static str = "investigator";
    const BUSINESS_ID_FIELD: &'static str = "investigatorId";

    fn business_id(&self) -> &str { &self.investigator_id }

    fn validate(&self) -> Result<(), ModelError> {
        require_non_blank(Self::BUSINESS_ID_FIELD, &self.investigator_id)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}
