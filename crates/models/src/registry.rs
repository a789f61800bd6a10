//! Declarative table of every entity type served by the backend.

use crate::entity::{CyodaEntity, EntityDescriptor};
use crate::{
    accrual::Accrual, investigator::Investigator, payment::Payment, protocol::Protocol,
    shipment::Shipment, site::Site, study::Study,
};

pub fn descriptors() -> Vec<EntityDescriptor> {
    vec![
        Accrual::descriptor(),
        Investigator::descriptor(),
        Payment::descriptor(),
        Protocol::descriptor(),
        Shipment::descriptor(),
        Site::descriptor(),
        Study::descriptor(),
    ]
}
