use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{require_non_blank, CyodaEntity};
use crate::errors::ModelError;

/// Subjects enrolled at a site for a study over a reporting period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accrual {
    pub accrual_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub subject_count: Option<i64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub recorded_on: Option<NaiveDate>,
}

impl CyodaEntity for Accrual {
    const ENTITY_NAME: &'static str = "accrual";
    const BUSINESS_ID_FIELD: &'static str = "accrualId";

    fn business_id(&self) -> &str { &self.accrual_id }

    fn validate(&self) -> Result<(), ModelError> {
        require_non_blank(Self::BUSINESS_ID_FIELD, &self.accrual_id)?;
        if matches!(self.subject_count, Some(n) if n < 0) {
            return Err(ModelError::Validation("subjectCount must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_subject_count_is_rejected() {
        let mut a = Accrual {
            accrual_id: "AC-1".into(),
            study_id: Some("ST-1".into()),
            site_id: None,
            subject_count: Some(-1),
            period: None,
            recorded_on: None,
        };
        assert!(a.validate().is_err());
        a.subject_count = Some(0);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn blank_business_id_is_rejected() {
        let a: Accrual = serde_json::from_value(serde_json::json!({"accrualId": ""})).expect("decode");
        assert!(matches!(a.validate(), Err(ModelError::Validation(_))));
    }
}
