//! Per-operation wiring of repositories onto one unit of work.

use std::sync::Arc;

use crate::domain::entity::Entity;
use crate::domain::error_catalogue::ErrorCatalogue;
use crate::domain::error_strategy::ErrorStrategy;
use crate::domain::models::{Invoice, Message, Profile, User};
use crate::domain::ports::{EntityStore, UnitOfWork};
use crate::settings::RepositorySettings;

use super::CrudRepository;
use super::pager::PageSizes;

/// Repository over users.
pub type UserRepository<U> = CrudRepository<User, U>;
/// Repository over invoices.
pub type InvoiceRepository<U> = CrudRepository<Invoice, U>;
/// Repository over profiles.
pub type ProfileRepository<U> = CrudRepository<Profile, U>;
/// Repository over messages. Messages cannot be updated, so this repository
/// has no `Update` capability.
pub type MessageRepository<U> = CrudRepository<Message, U>;

/// Everything needed to serve one logical operation: a single unit of work
/// and the classification strategy snapshot taken when the scope opened.
///
/// Every repository handed out shares the same unit of work, so their
/// staged writes commit together.
pub struct OperationScope<U> {
    uow: Arc<U>,
    strategy: Arc<dyn ErrorStrategy>,
    sizes: PageSizes,
}

impl<U: UnitOfWork> OperationScope<U> {
    /// Scope over `uow`. A bare `usize` for `sizes` is the maximum page size.
    pub fn new(
        uow: Arc<U>,
        strategy: Arc<dyn ErrorStrategy>,
        sizes: impl Into<PageSizes>,
    ) -> Self {
        Self {
            uow,
            strategy,
            sizes: sizes.into(),
        }
    }

    /// Scope over `uow` classified by the catalogue's current table and
    /// paged with the configured sizes.
    pub fn configured(
        uow: Arc<U>,
        catalogue: &ErrorCatalogue,
        settings: &RepositorySettings,
    ) -> Self {
        Self::new(
            uow,
            Arc::new(catalogue.strategy()),
            PageSizes::from_settings(settings),
        )
    }

    /// The shared unit of work.
    pub fn unit_of_work(&self) -> &Arc<U> {
        &self.uow
    }

    /// The scope's classification strategy.
    pub fn strategy(&self) -> &Arc<dyn ErrorStrategy> {
        &self.strategy
    }

    /// Page-size bounds handed to every repository.
    #[must_use]
    pub const fn page_sizes(&self) -> PageSizes {
        self.sizes
    }

    /// Repository for any stored entity type.
    pub fn repository<E>(&self) -> CrudRepository<E, U>
    where
        E: Entity,
        U: EntityStore<E>,
    {
        CrudRepository::new(
            Arc::clone(&self.uow),
            Arc::clone(&self.strategy),
            self.sizes,
        )
    }

    /// User repository.
    pub fn users(&self) -> UserRepository<U>
    where
        U: EntityStore<User>,
    {
        self.repository()
    }

    /// Invoice repository.
    pub fn invoices(&self) -> InvoiceRepository<U>
    where
        U: EntityStore<Invoice>,
    {
        self.repository()
    }

    /// Profile repository.
    pub fn profiles(&self) -> ProfileRepository<U>
    where
        U: EntityStore<Profile>,
    {
        self.repository()
    }

    /// Message repository.
    pub fn messages(&self) -> MessageRepository<U>
    where
        U: EntityStore<Message>,
    {
        self.repository()
    }
}
