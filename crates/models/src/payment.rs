use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{require_non_blank, CyodaEntity};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Payment {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("PAID"))
    }
}

impl CyodaEntity for Payment {
    const ENTITY_NAME: &'static str = "payment";
    const BUSINESS_ID_FIELD: &'static str = "paymentId";

    fn business_id(&self) -> &str { &self.payment_id }

    fn validate(&self) -> Result<(), ModelError> {
        require_non_blank(Self::BUSINESS_ID_FIELD, &self.payment_id)?;
        if matches!(self.amount, Some(a) if a < Decimal::ZERO) {
            return Err(ModelError::Validation("amount must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amount_round_trips_as_decimal() {
        let p: Payment = serde_json::from_value(serde_json::json!({
            "paymentId": "PAY-1",
            "amount": "1250.50",
            "status": "paid"
        }))
        .expect("decode");
        assert_eq!(p.amount, Some(Decimal::from_str("1250.50").unwrap()));
        assert!(p.is_paid());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let p = Payment {
            payment_id: "PAY-2".into(),
            study_id: None,
            site_id: None,
            amount: Some(Decimal::from(-5)),
            currency: Some("EUR".into()),
            status: None,
            due_date: None,
        };
        assert!(p.validate().is_err());
    }
}
