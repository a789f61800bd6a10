//! Domain records for the clinical operations backend and the contract they
//! share with the entity platform.

pub mod errors;
pub mod entity;
pub mod search;
pub mod registry;
pub mod dashboard;

pub mod accrual;
pub mod investigator;
pub mod payment;
pub mod protocol;
pub mod shipment;
pub mod site;
pub mod study;

pub use entity::{CyodaEntity, EntityDescriptor, EntityMetadata, EntityWithMetadata, ModelSpec, RawEntity};
pub use search::SearchCondition;
