//! Generic repository composed from the checker, the pager and a shared
//! unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Paginated;
use tracing::debug;

use crate::domain::entity::{CursorOrdered, Entity, EntityId, Updatable};
use crate::domain::error_strategy::{BusinessStrategy, ErrorStrategy};
use crate::domain::failure::Failure;
use crate::domain::operation::Operation;
use crate::domain::ports::{EntityStore, UnitOfWork};
use crate::domain::query::{Filter, StoreQuery};

use super::capabilities::{
    Activation, Create, CursorPage, Delete, ReadById, ReadFilter, ReadFilterCount,
    ReadFilterPage, Update,
};
use super::checker::EntityChecker;
use super::pager::{CursorPager, PageSizes};
use super::store_failure;

/// Repository for `E` backed by the unit of work `U`.
///
/// Each capability validates its input, stages its writes, and commits
/// through the shared unit of work exactly once. Store failures are
/// classified with the scope's strategy; validation failures use
/// [`BusinessStrategy`].
pub struct CrudRepository<E, U> {
    uow: Arc<U>,
    strategy: Arc<dyn ErrorStrategy>,
    checker: EntityChecker<E, U>,
    pager: CursorPager<E, U>,
}

impl<E, U> CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    /// Repository over `uow`; `sizes` bounds its cursor pages.
    pub fn new(
        uow: Arc<U>,
        strategy: Arc<dyn ErrorStrategy>,
        sizes: impl Into<PageSizes>,
    ) -> Self {
        Self {
            checker: EntityChecker::new(Arc::clone(&uow), Arc::clone(&strategy)),
            pager: CursorPager::new(Arc::clone(&uow), Arc::clone(&strategy), sizes),
            uow,
            strategy,
        }
    }

    /// The existence gate used by this repository.
    pub fn checker(&self) -> &EntityChecker<E, U> {
        &self.checker
    }

    /// The shared unit of work.
    pub fn unit_of_work(&self) -> &Arc<U> {
        &self.uow
    }

    async fn commit<T: Send>(&self, operation: &'static str, data: T) -> Operation<T> {
        match self.uow.commit().await {
            Ok(rows) => {
                debug!(entity = E::NAME, operation, rows, "committed");
                Operation::success(data)
            }
            Err(error) => store_failure(self.strategy.as_ref(), operation, &error),
        }
    }

    async fn load_existing<T>(&self, id: &str) -> Result<E, Operation<T>> {
        let parsed = EntityChecker::<E, U>::parse_id(id)?;
        self.load_parsed(parsed).await
    }

    async fn load_parsed<T>(&self, id: EntityId) -> Result<E, Operation<T>> {
        self.checker.find(id).await.into_result().map_err(Operation::from)
    }

    async fn set_active(&self, id: &str, active: bool) -> Operation<bool> {
        let mut entity = match self.load_existing(id).await {
            Ok(entity) => entity,
            Err(failed) => return failed,
        };
        entity.set_active(active);
        self.uow.stage_update(entity);
        let operation = if active { "activate" } else { "deactivate" };
        self.commit(operation, true).await
    }
}

#[async_trait]
impl<E, U> Create<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn create(&self, entity: E) -> Operation<E> {
        self.uow.stage_insert(entity.clone());
        self.commit("create", entity).await
    }
}

#[async_trait]
impl<E, U> ReadById<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn read_by_id(&self, id: &str) -> Operation<E> {
        self.checker.has_id(id).await
    }
}

#[async_trait]
impl<E, U> ReadFilter<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn read_filter(&self, filter: Filter<E>) -> Operation<Vec<E>> {
        let query = StoreQuery::new(filter).order_by_key(|row: &E| row.id());
        match self.uow.fetch(&query).await {
            Ok(rows) => Operation::success(rows),
            Err(error) => store_failure(self.strategy.as_ref(), "read filter", &error),
        }
    }
}

#[async_trait]
impl<E, U> ReadFilterCount<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn read_filter_count(&self, filter: Filter<E>) -> Operation<usize> {
        match self.uow.count(&filter).await {
            Ok(count) => Operation::success(count),
            Err(error) => store_failure(self.strategy.as_ref(), "count", &error),
        }
    }
}

#[async_trait]
impl<E, U> ReadFilterPage<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn read_filter_page(
        &self,
        filter: Filter<E>,
        page_number: usize,
        page_size: usize,
    ) -> Operation<Vec<E>> {
        if page_size == 0 {
            return Operation::fail(
                &Failure::invalid_data("page size must be at least 1"),
                &BusinessStrategy::invalid_data(),
            );
        }
        let Some(offset) = page_number.checked_mul(page_size) else {
            return Operation::fail(
                &Failure::invalid_data(format!(
                    "page {page_number} of size {page_size} is out of range"
                )),
                &BusinessStrategy::invalid_data(),
            );
        };
        let query = StoreQuery::new(filter)
            .order_by_key(|row: &E| row.id())
            .skip(offset)
            .take(page_size);
        match self.uow.fetch(&query).await {
            Ok(rows) => Operation::success(rows),
            Err(error) => store_failure(self.strategy.as_ref(), "read filter page", &error),
        }
    }
}

#[async_trait]
impl<E, U> Update<E> for CrudRepository<E, U>
where
    E: Updatable,
    U: UnitOfWork + EntityStore<E>,
{
    async fn update(&self, modified: E) -> Operation<E> {
        let unmodified = match self.load_parsed(modified.id()).await {
            Ok(entity) => entity,
            Err(failed) => return failed,
        };
        let merged = E::apply_updates(modified, &unmodified);
        self.uow.stage_update(merged.clone());
        self.commit("update", merged).await
    }
}

#[async_trait]
impl<E, U> Delete<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn delete(&self, id: &str) -> Operation<bool> {
        let existing = match self.load_existing(id).await {
            Ok(entity) => entity,
            Err(failed) => return failed,
        };
        self.uow.stage_delete(existing.id());
        self.commit("delete", true).await
    }
}

#[async_trait]
impl<E, U> Activation<E> for CrudRepository<E, U>
where
    E: Entity,
    U: UnitOfWork + EntityStore<E>,
{
    async fn activate(&self, id: &str) -> Operation<bool> {
        self.set_active(id, true).await
    }

    async fn deactivate(&self, id: &str) -> Operation<bool> {
        self.set_active(id, false).await
    }
}

#[async_trait]
impl<E, U> CursorPage<E> for CrudRepository<E, U>
where
    E: CursorOrdered,
    U: UnitOfWork + EntityStore<E>,
{
    async fn get_page(
        &self,
        filter: Filter<E>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Operation<Paginated<E>> {
        self.pager.get_page(filter, cursor, page_size).await
    }
}

impl<E, U> CrudRepository<E, U>
where
    E: CursorOrdered,
    U: UnitOfWork + EntityStore<E>,
{
    /// The cursor pagination engine used by [`CursorPage::get_page`].
    pub fn pager(&self) -> &CursorPager<E, U> {
        &self.pager
    }
}
