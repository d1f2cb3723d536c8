//! Result-oriented repositories.
//!
//! Capabilities are small traits ([`Create`], [`ReadById`], ...) implemented
//! by [`CrudRepository`], which composes an [`EntityChecker`], a
//! [`CursorPager`] and the operation's unit of work. Store failures never
//! escape: they are logged and classified into a failed
//! [`Operation`](crate::domain::Operation) at this boundary.

mod capabilities;
mod checker;
mod crud;
mod pager;
mod scope;

pub use capabilities::{
    Activation, Create, CursorPage, Delete, ReadById, ReadFilter, ReadFilterCount,
    ReadFilterPage, Update,
};
pub use checker::EntityChecker;
pub use crud::CrudRepository;
pub use pager::{CursorPager, PageSizes};
pub use scope::{
    InvoiceRepository, MessageRepository, OperationScope, ProfileRepository, UserRepository,
};

use tracing::debug;

use crate::domain::error_strategy::ErrorStrategy;
use crate::domain::failure::AsFailure;
use crate::domain::operation::Operation;
use crate::domain::ports::StoreError;

pub(crate) fn store_failure<T>(
    strategy: &dyn ErrorStrategy,
    operation: &'static str,
    error: &StoreError,
) -> Operation<T> {
    debug!(
        operation,
        failure = error.failure_type(),
        %error,
        "store call failed"
    );
    Operation::fail(&error.as_failure(), strategy)
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
