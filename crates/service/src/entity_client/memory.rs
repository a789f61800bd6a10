use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use models::{EntityDescriptor, EntityMetadata, ModelSpec, RawEntity, SearchCondition};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::EntityService;
use crate::errors::ServiceError;

pub const INITIAL_STATE: &str = "INITIAL";

/// In-process entity platform.
///
/// Enforces business-key uniqueness for every model registered through
/// [`InMemoryEntityService::with_descriptors`]. Transitions are not
/// validated: the transition name becomes the entity's state.
#[derive(Default)]
pub struct InMemoryEntityService {
    inner: RwLock<HashMap<ModelSpec, HashMap<Uuid, RawEntity>>>,
    business_fields: HashMap<ModelSpec, &'static str>,
}

fn business_value(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl InMemoryEntityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptors(descriptors: &[EntityDescriptor]) -> Arc<Self> {
        let business_fields = descriptors.iter().map(|d| (d.spec.clone(), d.business_id_field)).collect();
        Arc::new(Self { inner: RwLock::new(HashMap::new()), business_fields })
    }

    fn ensure_unique(
        &self,
        model: &ModelSpec,
        records: &HashMap<Uuid, RawEntity>,
        payload: &Value,
        except: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let Some(field) = self.business_fields.get(model) else { return Ok(()) };
        let Some(key) = business_value(payload, field) else { return Ok(()) };
        let taken = records
            .iter()
            .filter(|(id, _)| Some(**id) != except)
            .any(|(_, r)| business_value(&r.entity, field).as_deref() == Some(key.as_str()));
        if taken {
            return Err(ServiceError::Duplicate(format!("{} with {}={} already exists", model.name, field, key)));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityService for InMemoryEntityService {
    async fn create(&self, model: &ModelSpec, payload: Value) -> Result<RawEntity, ServiceError> {
        let mut map = self.inner.write().await;
        let records = map.entry(model.clone()).or_default();
        self.ensure_unique(model, records, &payload, None)?;
        let now = Utc::now();
        let raw = RawEntity {
            entity: payload,
            meta: EntityMetadata {
                id: Uuid::new_v4(),
                state: INITIAL_STATE.to_string(),
                version: 1,
                created_at: now,
                updated_at: now,
                last_transition: None,
            },
        };
        records.insert(raw.meta.id, raw.clone());
        debug!(model = %model, id = %raw.meta.id, "memory_entity_created");
        Ok(raw)
    }

    async fn get_by_id(&self, model: &ModelSpec, id: Uuid) -> Result<RawEntity, ServiceError> {
        let map = self.inner.read().await;
        map.get(model)
            .and_then(|records| records.get(&id))
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", model.name, id)))
    }

    async fn find_by_business_id(&self, model: &ModelSpec, field: &str, value: &str) -> Result<Option<RawEntity>, ServiceError> {
        let map = self.inner.read().await;
        let found = map.get(model).and_then(|records| {
            records
                .values()
                .find(|r| business_value(&r.entity, field).as_deref() == Some(value))
                .cloned()
        });
        Ok(found)
    }

    async fn update(&self, model: &ModelSpec, id: Uuid, payload: Value, transition: Option<&str>) -> Result<RawEntity, ServiceError> {
        let mut map = self.inner.write().await;
        let records = map.entry(model.clone()).or_default();
        if !records.contains_key(&id) {
            return Err(ServiceError::NotFound(format!("{} {} not found", model.name, id)));
        }
        self.ensure_unique(model, records, &payload, Some(id))?;
        let existing = records
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", model.name, id)))?;
        existing.entity = payload;
        existing.meta.version += 1;
        existing.meta.updated_at = Utc::now();
        if let Some(t) = transition {
            existing.meta.state = t.to_string();
            existing.meta.last_transition = Some(t.to_string());
        }
        debug!(model = %model, %id, transition = ?transition, "memory_entity_updated");
        Ok(existing.clone())
    }

    async fn search(&self, model: &ModelSpec, condition: &SearchCondition) -> Result<Vec<RawEntity>, ServiceError> {
        let map = self.inner.read().await;
        let mut hits: Vec<RawEntity> = map
            .get(model)
            .map(|records| records.values().filter(|r| condition.matches(&r.entity)).cloned().collect())
            .unwrap_or_default();
        hits.sort_by_key(|r| r.meta.created_at);
        Ok(hits)
    }

    async fn delete(&self, model: &ModelSpec, id: Uuid) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let removed = map.get_mut(model).and_then(|records| records.remove(&id));
        match removed {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!("{} {} not found", model.name, id))),
        }
    }
}
