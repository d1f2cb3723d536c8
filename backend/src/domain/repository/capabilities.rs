//! Narrow repository capabilities.
//!
//! A concrete repository implements only the capabilities its entity
//! supports; callers depend on the capability traits, not on the repository
//! type. Every capability returns an [`Operation`] and never panics or
//! propagates store errors.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::entity::{CursorOrdered, Entity, Updatable};
use crate::domain::operation::Operation;
use crate::domain::query::Filter;

/// Persist a new entity.
#[async_trait]
pub trait Create<E: Entity>: Send + Sync {
    /// Stage and commit `entity`, returning it on success.
    async fn create(&self, entity: E) -> Operation<E>;
}

/// Load one entity by identifier.
#[async_trait]
pub trait ReadById<E: Entity>: Send + Sync {
    /// Entity whose id equals `id`; fails when `id` is malformed or unknown.
    async fn read_by_id(&self, id: &str) -> Operation<E>;
}

/// Load every entity matching a filter.
#[async_trait]
pub trait ReadFilter<E: Entity>: Send + Sync {
    /// Matching entities ordered by id.
    async fn read_filter(&self, filter: Filter<E>) -> Operation<Vec<E>>;
}

/// Count entities matching a filter.
#[async_trait]
pub trait ReadFilterCount<E: Entity>: Send + Sync {
    /// Number of matching entities.
    async fn read_filter_count(&self, filter: Filter<E>) -> Operation<usize>;
}

/// Offset pagination for small, stable collections.
#[async_trait]
pub trait ReadFilterPage<E: Entity>: Send + Sync {
    /// Zero-based page `page_number` of matching entities ordered by id.
    async fn read_filter_page(
        &self,
        filter: Filter<E>,
        page_number: usize,
        page_size: usize,
    ) -> Operation<Vec<E>>;
}

/// Merge caller edits onto a stored entity.
#[async_trait]
pub trait Update<E: Updatable>: Send + Sync {
    /// Apply `modified`'s editable fields to the stored record with the same
    /// id, returning the merged record.
    async fn update(&self, modified: E) -> Operation<E>;
}

/// Remove an entity.
#[async_trait]
pub trait Delete<E: Entity>: Send + Sync {
    /// `true` once the entity is deleted; `false` data on failure.
    async fn delete(&self, id: &str) -> Operation<bool>;
}

/// Toggle the active flag.
#[async_trait]
pub trait Activation<E: Entity>: Send + Sync {
    /// Mark the entity active.
    async fn activate(&self, id: &str) -> Operation<bool>;

    /// Mark the entity inactive.
    async fn deactivate(&self, id: &str) -> Operation<bool>;
}

/// Cursor pagination for user-facing collections.
#[async_trait]
pub trait CursorPage<E: CursorOrdered>: Send + Sync {
    /// Page of matching entities after `cursor`.
    async fn get_page(
        &self,
        filter: Filter<E>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Operation<Paginated<E>>;
}
