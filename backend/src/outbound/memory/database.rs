//! Shared in-memory database.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ports::StoreError;
use crate::domain::repository::{OperationScope, PageSizes};
use crate::domain::{Entity, ErrorCatalogue, ErrorStrategy};
use crate::settings::RepositorySettings;

use super::tables::{Mutation, Tables, apply_batch};
use super::unit_of_work::InMemoryUnitOfWork;

#[derive(Default)]
struct Inner {
    tables: Mutex<Tables>,
    round_trips: AtomicUsize,
    faults: Mutex<VecDeque<Option<StoreError>>>,
}

/// Process-local store shared by any number of units of work.
///
/// Cloning is cheap and yields a handle to the same data. Every store call
/// made through a unit of work counts as one round trip; queued faults are
/// returned by later round trips in order.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    inner: Arc<Inner>,
}

impl InMemoryDatabase {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a unit of work over this database.
    pub fn unit_of_work(&self) -> InMemoryUnitOfWork {
        InMemoryUnitOfWork::new(self.clone())
    }

    /// Open a unit of work and wrap it in an [`OperationScope`].
    pub fn scope(
        &self,
        strategy: Arc<dyn ErrorStrategy>,
        sizes: impl Into<PageSizes>,
    ) -> OperationScope<InMemoryUnitOfWork> {
        OperationScope::new(Arc::new(self.unit_of_work()), strategy, sizes)
    }

    /// Open a unit of work wired from `catalogue` and `settings`.
    pub fn configured_scope(
        &self,
        catalogue: &ErrorCatalogue,
        settings: &RepositorySettings,
    ) -> OperationScope<InMemoryUnitOfWork> {
        OperationScope::configured(Arc::new(self.unit_of_work()), catalogue, settings)
    }

    /// Store calls made so far.
    pub fn round_trips(&self) -> usize {
        self.inner.round_trips.load(Ordering::SeqCst)
    }

    /// Make the next unclaimed round trip fail with `error`.
    pub fn inject_fault(&self, error: StoreError) {
        self.inject_fault_after(0, error);
    }

    /// Let `passing` round trips succeed, then fail the following one with
    /// `error`.
    pub fn inject_fault_after(&self, passing: usize, error: StoreError) {
        let mut faults = self.faults();
        faults.extend(std::iter::repeat_n(None, passing));
        faults.push_back(Some(error));
    }

    /// Committed rows of `E`, ordered by id.
    pub fn committed<E: Entity>(&self) -> Vec<E> {
        self.tables().rows()
    }

    pub(crate) fn round_trip(&self) -> Result<(), StoreError> {
        self.inner.round_trips.fetch_add(1, Ordering::SeqCst);
        self.faults().pop_front().flatten().map_or(Ok(()), Err)
    }

    pub(crate) fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner
            .tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn apply(&self, batch: &[Box<dyn Mutation>]) -> Result<usize, StoreError> {
        apply_batch(&mut self.tables(), batch)
    }

    fn faults(&self) -> MutexGuard<'_, VecDeque<Option<StoreError>>> {
        self.inner
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
