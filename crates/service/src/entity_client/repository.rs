use std::marker::PhantomData;
use std::sync::Arc;

use models::{CyodaEntity, EntityWithMetadata, SearchCondition};
use tracing::{info, instrument};
use uuid::Uuid;

use super::EntityService;
use crate::errors::ServiceError;
use crate::observability::ENTITY_OPERATIONS_TOTAL;

/// `None`, empty or whitespace-only transition names mean "no transition".
pub fn normalize_transition(transition: Option<&str>) -> Option<&str> {
    transition.filter(|t| !t.trim().is_empty())
}

/// Typed access to one entity type through the shared [`EntityService`].
pub struct EntityRepository<T: CyodaEntity> {
    client: Arc<dyn EntityService>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: CyodaEntity> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), _entity: PhantomData }
    }
}

impl<T: CyodaEntity> EntityRepository<T> {
    pub fn new(client: Arc<dyn EntityService>) -> Self {
        Self { client, _entity: PhantomData }
    }

    fn count(op: &str) {
        ENTITY_OPERATIONS_TOTAL.with_label_values(&[T::ENTITY_NAME, op]).inc();
    }

    #[instrument(skip(self, entity), fields(entity = T::ENTITY_NAME, business_id = %entity.business_id()))]
    pub async fn create(&self, entity: T) -> Result<EntityWithMetadata<T>, ServiceError> {
        Self::count("create");
        entity.validate()?;
        let payload = serde_json::to_value(&entity).map_err(models::errors::ModelError::from)?;
        let created = self.client.create(&T::model_spec(), payload).await?.into_typed::<T>()?;
        info!(id = %created.meta.id, "entity_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<EntityWithMetadata<T>, ServiceError> {
        Self::count("get");
        Ok(self.client.get_by_id(&T::model_spec(), id).await?.into_typed()?)
    }

    pub async fn get_by_business_id(&self, business_id: &str) -> Result<Option<EntityWithMetadata<T>>, ServiceError> {
        Self::count("get_by_business_id");
        let found = self
            .client
            .find_by_business_id(&T::model_spec(), T::BUSINESS_ID_FIELD, business_id)
            .await?;
        match found {
            Some(raw) => Ok(Some(raw.into_typed()?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, entity), fields(entity = T::ENTITY_NAME))]
    pub async fn update(&self, id: Uuid, entity: T, transition: Option<&str>) -> Result<EntityWithMetadata<T>, ServiceError> {
        Self::count("update");
        entity.validate()?;
        let transition = normalize_transition(transition);
        let payload = serde_json::to_value(&entity).map_err(models::errors::ModelError::from)?;
        let updated = self.client.update(&T::model_spec(), id, payload, transition).await?.into_typed::<T>()?;
        info!(transition = ?transition, state = %updated.meta.state, "entity_updated");
        Ok(updated)
    }

    /// Resolve the technical id for `business_id`, then update.
    pub async fn update_by_business_id(
        &self,
        business_id: &str,
        entity: T,
        transition: Option<&str>,
    ) -> Result<EntityWithMetadata<T>, ServiceError> {
        let existing = self
            .get_by_business_id(business_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", T::ENTITY_NAME, business_id)))?;
        self.update(existing.meta.id, entity, transition).await
    }

    pub async fn list(&self) -> Result<Vec<EntityWithMetadata<T>>, ServiceError> {
        self.search(&SearchCondition::all()).await
    }

    pub async fn search(&self, condition: &SearchCondition) -> Result<Vec<EntityWithMetadata<T>>, ServiceError> {
        Self::count("search");
        let hits = self.client.search(&T::model_spec(), condition).await?;
        hits.into_iter()
            .map(|raw| raw.into_typed().map_err(ServiceError::from))
            .collect()
    }

    #[instrument(skip(self), fields(entity = T::ENTITY_NAME))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        Self::count("delete");
        self.client.delete(&T::model_spec(), id).await?;
        info!("entity_deleted");
        Ok(())
    }
}
