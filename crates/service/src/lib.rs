//! Service layer between the HTTP handlers and the entity platform.
//! - `entity_client`: the Entity Access Client contract and its implementations.
//! - `shipment`: status → workflow transition table.
//! - `dashboard`: portfolio summary behind a TTL cache.

pub mod errors;
pub mod observability;
pub mod entity_client;
pub mod shipment;
pub mod dashboard;
