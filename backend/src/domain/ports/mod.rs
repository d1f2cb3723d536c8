//! Driven ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod entity_store;
mod unit_of_work;

pub use entity_store::{EntityStore, StoreError};
pub use unit_of_work::UnitOfWork;
