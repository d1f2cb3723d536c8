//! Port for query-capable entity storage and its errors.

use async_trait::async_trait;

use crate::domain::entity::{Entity, EntityId};
use crate::domain::failure::{AsFailure, Failure};
use crate::domain::query::{Filter, StoreQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by store adapters.
    pub enum StoreError {
        /// The store could not be reached.
        Connection { message: String } => "store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } => "store query failed: {message}",
        /// A write collided with existing state.
        Conflict { message: String } => "store write conflict: {message}",
        /// The store did not answer in time.
        Timeout { message: String } => "store operation timed out: {message}",
        /// Transaction control was used out of order or failed.
        Transaction { message: String } => "store transaction failed: {message}",
    }
}

impl StoreError {
    /// Stable failure-type name used as the error-mapping lookup key.
    pub fn failure_type(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "StoreConnectionError",
            Self::Query { .. } => "StoreQueryError",
            Self::Conflict { .. } => "StoreConflictError",
            Self::Timeout { .. } => "StoreTimeoutError",
            Self::Transaction { .. } => "StoreTransactionError",
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Connection { message }
            | Self::Query { message }
            | Self::Conflict { message }
            | Self::Timeout { message }
            | Self::Transaction { message } => message,
        }
    }
}

impl AsFailure for StoreError {
    fn as_failure(&self) -> Failure {
        Failure::new(self.failure_type(), self.detail())
    }
}

/// Reads and staged writes for one entity type.
///
/// Reads see the store's committed state plus whatever the surrounding unit
/// of work has already flushed inside an open transaction. Staged writes are
/// invisible until the unit of work commits.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Rows matching `query`, in the query's order.
    async fn fetch(&self, query: &StoreQuery<E>) -> Result<Vec<E>, StoreError>;

    /// Number of rows matching `filter`.
    async fn count(&self, filter: &Filter<E>) -> Result<usize, StoreError>;

    /// Row with identifier `id`.
    async fn find(&self, id: EntityId) -> Result<Option<E>, StoreError>;

    /// Stage an insert.
    fn stage_insert(&self, entity: E);

    /// Stage a full replacement of an existing row.
    fn stage_update(&self, entity: E);

    /// Stage removal of an existing row.
    fn stage_delete(&self, id: EntityId);
}
