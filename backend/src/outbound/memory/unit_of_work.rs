//! Per-operation unit of work over [`InMemoryDatabase`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{EntityStore, StoreError, UnitOfWork};
use crate::domain::{Entity, EntityId, Filter, StoreQuery};

use super::database::InMemoryDatabase;
use super::tables::{Mutation, Staged, Tables, apply_batch};

struct Transaction {
    working: Tables,
    log: Vec<Box<dyn Mutation>>,
}

#[derive(Default)]
struct UowState {
    pending: Vec<Box<dyn Mutation>>,
    transaction: Option<Transaction>,
}

/// Unit of work backed by an [`InMemoryDatabase`].
///
/// Without an explicit transaction each `commit` applies the staged batch to
/// the database atomically. Inside a transaction, `commit` applies it to a
/// private working copy that later reads observe, and `commit_transaction`
/// replays every flushed write onto the database in one atomic batch. A
/// failed commit discards the batch it was applying.
pub struct InMemoryUnitOfWork {
    db: InMemoryDatabase,
    state: Mutex<UowState>,
}

impl InMemoryUnitOfWork {
    pub(crate) fn new(db: InMemoryDatabase) -> Self {
        Self {
            db,
            state: Mutex::new(UowState::default()),
        }
    }

    /// The database this unit of work writes to.
    pub fn database(&self) -> &InMemoryDatabase {
        &self.db
    }

    /// Number of writes staged since the last commit.
    pub fn pending(&self) -> usize {
        self.state().pending.len()
    }

    fn state(&self) -> MutexGuard<'_, UowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stage(&self, mutation: Box<dyn Mutation>) {
        self.state().pending.push(mutation);
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        self.db.round_trip()?;
        let state = self.state();
        Ok(match &state.transaction {
            Some(transaction) => f(&transaction.working),
            None => f(&self.db.tables()),
        })
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryUnitOfWork {
    async fn fetch(&self, query: &StoreQuery<E>) -> Result<Vec<E>, StoreError> {
        self.read(|tables| query.apply(tables.rows::<E>()))
    }

    async fn count(&self, filter: &Filter<E>) -> Result<usize, StoreError> {
        self.read(|tables| {
            tables
                .rows::<E>()
                .iter()
                .filter(|row| filter.matches(row))
                .count()
        })
    }

    async fn find(&self, id: EntityId) -> Result<Option<E>, StoreError> {
        self.read(|tables| tables.get::<E>(id))
    }

    fn stage_insert(&self, entity: E) {
        self.stage(Box::new(Staged::Insert(entity)));
    }

    fn stage_update(&self, entity: E) {
        self.stage(Box::new(Staged::Replace(entity)));
    }

    fn stage_delete(&self, id: EntityId) {
        self.stage(Box::new(Staged::<E>::Remove(id)));
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&self) -> Result<usize, StoreError> {
        let batch = std::mem::take(&mut self.state().pending);
        self.db.round_trip()?;
        let mut state = self.state();
        match state.transaction.as_mut() {
            Some(transaction) => {
                let rows = apply_batch(&mut transaction.working, &batch)?;
                transaction.log.extend(batch);
                Ok(rows)
            }
            None => self.db.apply(&batch),
        }
    }

    async fn begin_transaction(&self) -> Result<(), StoreError> {
        self.db.round_trip()?;
        let mut state = self.state();
        if state.transaction.is_some() {
            return Err(StoreError::transaction("a transaction is already open"));
        }
        state.transaction = Some(Transaction {
            working: self.db.tables().clone(),
            log: Vec::new(),
        });
        Ok(())
    }

    async fn commit_transaction(&self) -> Result<usize, StoreError> {
        let (mut log, pending) = {
            let mut state = self.state();
            let Some(transaction) = state.transaction.take() else {
                return Err(StoreError::transaction("no transaction is open"));
            };
            (transaction.log, std::mem::take(&mut state.pending))
        };
        log.extend(pending);
        self.db.round_trip()?;
        self.db.apply(&log)
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        let mut state = self.state();
        state.pending.clear();
        state.transaction = None;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.state().transaction.is_some()
    }
}
