//! Type-erased entity tables and staged mutations.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use crate::domain::ports::StoreError;
use crate::domain::{Entity, EntityId};

trait AnyTable: Send + Sync {
    fn clone_box(&self) -> Box<dyn AnyTable>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Entity> AnyTable for BTreeMap<EntityId, E> {
    fn clone_box(&self) -> Box<dyn AnyTable> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One table per entity type, keyed by id.
#[derive(Default)]
pub(crate) struct Tables {
    by_type: HashMap<TypeId, Box<dyn AnyTable>>,
}

impl Clone for Tables {
    fn clone(&self) -> Self {
        Self {
            by_type: self
                .by_type
                .iter()
                .map(|(type_id, table)| (*type_id, table.clone_box()))
                .collect(),
        }
    }
}

impl Tables {
    fn table<E: Entity>(&self) -> Option<&BTreeMap<EntityId, E>> {
        self.by_type
            .get(&TypeId::of::<E>())
            .and_then(|table| table.as_any().downcast_ref())
    }

    fn table_mut<E: Entity>(&mut self) -> Option<&mut BTreeMap<EntityId, E>> {
        self.by_type
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(BTreeMap::<EntityId, E>::new()))
            .as_any_mut()
            .downcast_mut()
    }

    /// Every row of `E`, ordered by id.
    pub(crate) fn rows<E: Entity>(&self) -> Vec<E> {
        self.table::<E>()
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Row `id` of `E`.
    pub(crate) fn get<E: Entity>(&self, id: EntityId) -> Option<E> {
        self.table::<E>().and_then(|table| table.get(&id).cloned())
    }

    fn write<E: Entity>(&mut self) -> Result<&mut BTreeMap<EntityId, E>, StoreError> {
        self.table_mut::<E>()
            .ok_or_else(|| StoreError::query(format!("{} table has the wrong row type", E::NAME)))
    }
}

/// A write waiting for the unit of work to commit.
pub(crate) trait Mutation: Send + Sync {
    /// Apply to `tables`, failing when the write conflicts with their state.
    fn apply(&self, tables: &mut Tables) -> Result<(), StoreError>;
}

pub(crate) enum Staged<E> {
    Insert(E),
    Replace(E),
    Remove(EntityId),
}

impl<E: Entity> Mutation for Staged<E> {
    fn apply(&self, tables: &mut Tables) -> Result<(), StoreError> {
        let table = tables.write::<E>()?;
        match self {
            Self::Insert(entity) => {
                let id = entity.id();
                if table.contains_key(&id) {
                    return Err(StoreError::conflict(format!(
                        "{} {id} already exists",
                        E::NAME
                    )));
                }
                table.insert(id, entity.clone());
            }
            Self::Replace(entity) => {
                let id = entity.id();
                let Some(slot) = table.get_mut(&id) else {
                    return Err(StoreError::conflict(format!(
                        "{} {id} no longer exists",
                        E::NAME
                    )));
                };
                *slot = entity.clone();
            }
            Self::Remove(id) => {
                if table.remove(id).is_none() {
                    return Err(StoreError::conflict(format!(
                        "{} {id} no longer exists",
                        E::NAME
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Apply `batch` to `tables` all-or-nothing, returning the affected row
/// count.
pub(crate) fn apply_batch(
    tables: &mut Tables,
    batch: &[Box<dyn Mutation>],
) -> Result<usize, StoreError> {
    if batch.is_empty() {
        return Ok(0);
    }
    let mut scratch = tables.clone();
    for mutation in batch {
        mutation.apply(&mut scratch)?;
    }
    *tables = scratch;
    Ok(batch.len())
}
