//! Platform-facing entity contract.
//!
//! Every record kept on the entity platform is addressed by a [`ModelSpec`]
//! (name + version) and carries platform-owned [`EntityMetadata`] next to the
//! business payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Name + version pair identifying an entity type on the platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub version: u32,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self { name: name.into(), version }
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.name, self.version)
    }
}

/// Metadata assigned and owned by the entity platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub id: Uuid,
    pub state: String,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<String>,
}

/// Business payload plus its platform metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityWithMetadata<T> {
    pub entity: T,
    pub meta: EntityMetadata,
}

/// Untyped form exchanged with the platform.
pub type RawEntity = EntityWithMetadata<serde_json::Value>;

impl RawEntity {
    /// Decode the JSON payload into a concrete entity type.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<EntityWithMetadata<T>, ModelError> {
        let entity = serde_json::from_value(self.entity)?;
        Ok(EntityWithMetadata { entity, meta: self.meta })
    }
}

/// Declarative description of an entity type: how the platform addresses it
/// and which JSON field holds its business identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub spec: ModelSpec,
    pub business_id_field: &'static str,
}

/// A business record stored on the entity platform.
pub trait CyodaEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const ENTITY_NAME: &'static str;
    const ENTITY_VERSION: u32 = 1;
    /// JSON field carrying the business identifier, e.g. `accrualId`.
    const BUSINESS_ID_FIELD: &'static str;

    fn business_id(&self) -> &str;

    /// Checks applied before a payload is forwarded to the platform.
    fn validate(&self) -> Result<(), ModelError> {
        require_non_blank(Self::BUSINESS_ID_FIELD, self.business_id())
    }

    fn model_spec() -> ModelSpec {
        ModelSpec::new(Self::ENTITY_NAME, Self::ENTITY_VERSION)
    }

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor { spec: Self::model_spec(), business_id_field: Self::BUSINESS_ID_FIELD }
    }
}

pub fn require_non_blank(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}
