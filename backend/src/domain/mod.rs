//! Domain core: results, error classification, entity contracts and
//! repositories.
//!
//! Public surface:
//! - `Operation`: uniform success/failure result.
//! - `ErrorKind`: closed failure taxonomy.
//! - `ErrorMappingTable` / `ErrorCatalogue`: JSON-driven classification data.
//! - `ErrorStrategy`: classifier implemented by `MappedErrorStrategy` and
//!   `BusinessStrategy`.
//! - Entity contracts (`Entity`, `Updatable`, `CursorOrdered`, ...).
//! - `repository`: capabilities, checker, pager and `CrudRepository`.

pub mod entity;
pub mod error_catalogue;
pub mod error_kind;
pub mod error_mapping;
pub mod error_strategy;
pub mod failure;
pub mod models;
pub mod onboarding;
pub mod operation;
pub mod ports;
pub mod query;
pub mod repository;

pub use self::entity::{
    Activatable, CursorOrdered, Entity, EntityId, EntityIdError, Identifiable, TenantId,
    TenantScoped, Updatable,
};
pub use self::error_catalogue::ErrorCatalogue;
pub use self::error_kind::{ErrorKind, ErrorKindMetadata, ParseErrorKindError, metadata_for_name};
pub use self::error_mapping::{ErrorMappingEntry, ErrorMappingError, ErrorMappingTable};
pub use self::error_strategy::{
    BusinessStrategy, Classification, ErrorStrategy, MappedErrorStrategy,
    STRATEGY_MISSING_MESSAGE,
};
pub use self::failure::{AsFailure, Failure};
pub use self::onboarding::{OnboardingRequest, OnboardingService};
pub use self::operation::{Operation, OperationDecodeError, OperationFailure};
pub use self::query::{Filter, StoreQuery};
