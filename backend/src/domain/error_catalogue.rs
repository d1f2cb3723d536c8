//! Process-level holder for the loaded error-mapping table.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::error_mapping::ErrorMappingTable;
use super::error_strategy::MappedErrorStrategy;
use crate::settings::RepositorySettings;

/// Owns the current error-mapping table and hands out per-scope strategies.
///
/// Strategies take an `Arc` snapshot of the table, so classification never
/// contends on the catalogue. [`ErrorCatalogue::reload`] swaps the whole
/// table; scopes opened before the swap keep classifying against the table
/// they started with.
#[derive(Debug, Default)]
pub struct ErrorCatalogue {
    table: RwLock<Option<Arc<ErrorMappingTable>>>,
}

impl ErrorCatalogue {
    /// Catalogue serving `table`.
    pub fn new(table: ErrorMappingTable) -> Self {
        Self {
            table: RwLock::new(Some(Arc::new(table))),
        }
    }

    /// Catalogue with no table; every failure classifies as
    /// `NullExceptionStrategy`.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Load a table from `path`.
    ///
    /// A missing or invalid file is logged and yields an unconfigured
    /// catalogue rather than an error.
    pub fn load(path: &Path) -> Self {
        match ErrorMappingTable::from_file(path) {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    entries = table.len(),
                    "error mapping table loaded"
                );
                Self::new(table)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "error mapping table unavailable; failures will classify as NullExceptionStrategy"
                );
                Self::unconfigured()
            }
        }
    }

    /// Load the table named by `settings`, falling back as
    /// [`ErrorCatalogue::load`] does.
    pub fn from_settings(settings: &RepositorySettings) -> Self {
        Self::load(&settings.error_map_path())
    }

    /// Strategy for one logical operation scope.
    pub fn strategy(&self) -> MappedErrorStrategy {
        MappedErrorStrategy::from_snapshot(self.snapshot())
    }

    /// Whether a table is currently loaded.
    pub fn is_configured(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Replace the current table wholesale.
    pub fn reload(&self, table: ErrorMappingTable) {
        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(table));
    }

    /// Drop the current table.
    pub fn clear(&self) {
        let mut guard = self.table.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    fn snapshot(&self) -> Option<Arc<ErrorMappingTable>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
