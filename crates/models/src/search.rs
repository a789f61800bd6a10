//! Search conditions understood by the entity platform.
//!
//! A [`SearchCondition`] with no field conditions matches every entity.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    IContains,
    GreaterThan,
    LessThan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    /// Dotted path into the entity payload, e.g. `status` or `address.city`.
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCondition {
    #[serde(default)]
    pub operator: GroupOperator,
    #[serde(default)]
    pub conditions: Vec<FieldCondition>,
}

impl SearchCondition {
    /// Condition matching every entity.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            operator: GroupOperator::And,
            conditions: vec![FieldCondition { field: field.into(), operator: Operator::Equals, value: value.into() }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, entity: &Value) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.operator {
            GroupOperator::And => self.conditions.iter().all(|c| c.matches(entity)),
            GroupOperator::Or => self.conditions.iter().any(|c| c.matches(entity)),
        }
    }
}

impl FieldCondition {
    pub fn matches(&self, entity: &Value) -> bool {
        let actual = lookup(entity, &self.field);
        match self.operator {
            Operator::Equals => actual.is_some_and(|a| loosely_equal(a, &self.value)),
            Operator::NotEquals => !actual.is_some_and(|a| loosely_equal(a, &self.value)),
            Operator::IContains => match (actual.and_then(Value::as_str), self.value.as_str()) {
                (Some(a), Some(needle)) => a.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Operator::GreaterThan => actual.and_then(|a| compare(a, &self.value)) == Some(Ordering::Greater),
            Operator::LessThan => actual.and_then(|a| compare(a, &self.value)) == Some(Ordering::Less),
        }
    }
}

fn lookup<'a>(entity: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(entity, |v, key| v.get(key))
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        // decimals travel as strings
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Number(_), _) | (_, Value::Number(_)) => {
            matches!((as_number(a), as_number(b)), (Some(x), Some(y)) if x == y)
        }
        _ => false,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(nx), Ok(ny)) => nx.partial_cmp(&ny),
            _ => Some(x.cmp(y)),
        },
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}
