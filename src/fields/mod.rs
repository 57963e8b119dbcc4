//! Field-level encryption: adapters, policy table, and entity transforms

pub mod adapters;
pub mod policy;
pub mod transform;

pub use adapters::AdapterKind;
pub use policy::{Entity, FieldRule};
pub use transform::{FieldShield, Record};
