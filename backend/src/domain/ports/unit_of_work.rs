//! Port for the per-operation transaction scope.

use async_trait::async_trait;

use super::StoreError;

/// One transactional scope shared by every repository serving a single
/// logical operation.
///
/// Outside an explicit transaction, [`UnitOfWork::commit`] applies all staged
/// writes atomically. Inside one, `commit` flushes staged writes into the
/// transaction and they become durable only on
/// [`UnitOfWork::commit_transaction`].
///
/// Calls through one instance are expected to be sequential. Dropping a
/// pending call leaves any open transaction unresolved; the caller rolls it
/// back.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Flush staged writes, returning the number of affected rows.
    async fn commit(&self) -> Result<usize, StoreError>;

    /// Open an explicit transaction.
    async fn begin_transaction(&self) -> Result<(), StoreError>;

    /// Make the open transaction durable, returning the number of rows it
    /// affected.
    async fn commit_transaction(&self) -> Result<usize, StoreError>;

    /// Discard staged writes and any open transaction.
    async fn rollback(&self) -> Result<(), StoreError>;

    /// Whether an explicit transaction is open.
    fn in_transaction(&self) -> bool;
}
