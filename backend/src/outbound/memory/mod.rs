//! In-memory store adapter implementing the data-store and unit-of-work
//! ports.
//!
//! Each [`InMemoryUnitOfWork`] is one transaction scope over a shared
//! [`InMemoryDatabase`]. The adapter keeps a round-trip counter and a fault
//! queue so callers can assert when the store is (or is not) touched and how
//! failures are classified.

mod database;
mod tables;
mod unit_of_work;

pub use database::InMemoryDatabase;
pub use unit_of_work::InMemoryUnitOfWork;
