//! Result-oriented repository framework for a multi-tenant backend.
//!
//! Every repository call returns a [`domain::Operation`]: a success with a
//! payload or a failure with a classified [`domain::ErrorKind`]. Store
//! failures are classified through an error-mapping table loaded from JSON;
//! expected rule violations bypass the table.

pub mod domain;
pub mod outbound;
pub mod settings;

pub use settings::RepositorySettings;
