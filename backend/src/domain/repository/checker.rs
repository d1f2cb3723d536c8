//! Existence and id-format gate run before any repository mutation.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::entity::{Entity, EntityId, EntityIdError};
use crate::domain::error_strategy::{BusinessStrategy, ErrorStrategy};
use crate::domain::failure::Failure;
use crate::domain::operation::Operation;
use crate::domain::ports::EntityStore;

use super::store_failure;

/// Validates identifiers and confirms entities exist.
///
/// Malformed identifiers are rejected without touching the store.
pub struct EntityChecker<E, S> {
    store: Arc<S>,
    strategy: Arc<dyn ErrorStrategy>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> EntityChecker<E, S>
where
    E: Entity,
    S: EntityStore<E>,
{
    /// Checker reading from `store` and classifying store failures with
    /// `strategy`.
    pub fn new(store: Arc<S>, strategy: Arc<dyn ErrorStrategy>) -> Self {
        Self {
            store,
            strategy,
            _entity: PhantomData,
        }
    }

    /// Parse `id` into an [`EntityId`], failing with a classified result.
    ///
    /// Blank input is `InvalidData`; anything other than a canonical UUID is
    /// `BusinessValidation`.
    pub fn parse_id<T>(id: &str) -> Result<EntityId, Operation<T>> {
        EntityId::parse(id).map_err(|error| match error {
            EntityIdError::Empty => Operation::fail(
                &Failure::invalid_data(format!("{} id must not be empty", E::NAME)),
                &BusinessStrategy::invalid_data(),
            ),
            EntityIdError::Malformed { input } => Operation::fail(
                &Failure::rule(format!("'{input}' is not a valid {} id", E::NAME)),
                &BusinessStrategy::rule(),
            ),
        })
    }

    /// Load the entity identified by `id`.
    pub async fn has_id(&self, id: &str) -> Operation<E> {
        match Self::parse_id(id) {
            Ok(parsed) => self.find(parsed).await,
            Err(failed) => failed,
        }
    }

    /// Load the entity identified by an already parsed `id`.
    pub async fn find(&self, id: EntityId) -> Operation<E> {
        match self.store.find(id).await {
            Ok(Some(entity)) => Operation::success(entity),
            Ok(None) => Self::not_found(),
            Err(error) => store_failure(self.strategy.as_ref(), "find", &error),
        }
    }

    /// Fail when `entity` is absent.
    ///
    /// Repositories take entities by value and never call this; it gates
    /// optional references supplied by callers outside the repository,
    /// before they reach a capability.
    pub fn has_entity(entity: Option<E>) -> Operation<E> {
        entity.map_or_else(
            || {
                Operation::fail(
                    &Failure::rule(format!("{} must be provided", E::NAME)),
                    &BusinessStrategy::rule(),
                )
            },
            Operation::success,
        )
    }

    /// The standard "not found" failure for `E`.
    pub fn not_found<T>() -> Operation<T> {
        Operation::fail(
            &Failure::rule(format!("{} not found", E::NAME)),
            &BusinessStrategy::rule(),
        )
    }
}
