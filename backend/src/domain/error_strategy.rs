//! Error classification strategies.
//!
//! A strategy turns a [`Failure`] into a [`Classification`]: the
//! [`ErrorKind`] and message carried by a failed operation. Classification is
//! a pure function of the failure and the strategy's immutable state.

use std::sync::Arc;

use super::error_kind::ErrorKind;
use super::error_mapping::ErrorMappingTable;
use super::failure::Failure;

/// Diagnostic attached to failures classified without a mapping table.
pub const STRATEGY_MISSING_MESSAGE: &str =
    "Error classification is unavailable: no error mapping table is loaded";

/// Kind and message produced for one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    kind: ErrorKind,
    message: String,
}

impl Classification {
    /// Pair a kind with a message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Assigned kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_parts(self) -> (ErrorKind, String) {
        (self.kind, self.message)
    }
}

/// Maps a failure to its classification.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorStrategy: Send + Sync {
    /// Classify `failure`.
    fn classify(&self, failure: &Failure) -> Classification;
}

/// Strategy backed by a loaded [`ErrorMappingTable`].
///
/// Lookup order: exact failure-name match, then the table's default entry.
/// Without a table every failure is classified as
/// [`ErrorKind::NullExceptionStrategy`].
#[derive(Debug, Clone, Default)]
pub struct MappedErrorStrategy {
    table: Option<Arc<ErrorMappingTable>>,
}

impl MappedErrorStrategy {
    /// Strategy reading from `table`.
    pub fn new(table: Arc<ErrorMappingTable>) -> Self {
        Self { table: Some(table) }
    }

    /// Strategy with no table loaded.
    pub fn unconfigured() -> Self {
        Self { table: None }
    }

    pub(crate) fn from_snapshot(table: Option<Arc<ErrorMappingTable>>) -> Self {
        Self { table }
    }

    /// Whether a table backs this strategy.
    pub fn is_configured(&self) -> bool {
        self.table.is_some()
    }
}

impl ErrorStrategy for MappedErrorStrategy {
    fn classify(&self, failure: &Failure) -> Classification {
        match self.table.as_deref() {
            Some(table) => {
                let entry = table.resolve(failure.type_name());
                Classification::new(entry.kind(), entry.render(failure.detail()))
            }
            None => Classification::new(
                ErrorKind::NullExceptionStrategy,
                STRATEGY_MISSING_MESSAGE,
            ),
        }
    }
}

/// Table-free strategy for expected domain-rule violations.
///
/// The failure detail is used verbatim as the message.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::{BusinessStrategy, ErrorKind, ErrorStrategy, Failure};
///
/// let classification = BusinessStrategy::rule().classify(&Failure::rule("User not found"));
/// assert_eq!(classification.kind(), ErrorKind::BusinessValidation);
/// assert_eq!(classification.message(), "User not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessStrategy {
    kind: ErrorKind,
}

impl BusinessStrategy {
    /// Classify as [`ErrorKind::BusinessValidation`].
    pub const fn rule() -> Self {
        Self {
            kind: ErrorKind::BusinessValidation,
        }
    }

    /// Classify as [`ErrorKind::InvalidData`].
    pub const fn invalid_data() -> Self {
        Self {
            kind: ErrorKind::InvalidData,
        }
    }

    /// Kind this strategy assigns.
    pub const fn kind(self) -> ErrorKind {
        self.kind
    }
}

impl Default for BusinessStrategy {
    fn default() -> Self {
        Self::rule()
    }
}

impl ErrorStrategy for BusinessStrategy {
    fn classify(&self, failure: &Failure) -> Classification {
        Classification::new(self.kind, failure.detail())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn table() -> Arc<ErrorMappingTable> {
        let table = ErrorMappingTable::from_json(
            r#"{
                "version": 1,
                "default": { "kind": "Resource", "message": "Declared default: {detail}" },
                "entries": [
                    { "failure": "StoreConflictError", "kind": "Database", "message": "Conflict: {detail}" }
                ]
            }"#,
        )
        .expect("valid table");
        Arc::new(table)
    }

    #[rstest]
    fn exact_matches_win() {
        let strategy = MappedErrorStrategy::new(table());
        let classification = strategy.classify(&Failure::new("StoreConflictError", "dup key"));
        assert_eq!(classification.kind(), ErrorKind::Database);
        assert_eq!(classification.message(), "Conflict: dup key");
    }

    #[rstest]
    fn unmatched_failures_use_declared_default_kind() {
        let strategy = MappedErrorStrategy::new(table());
        let classification = strategy.classify(&Failure::new("Unmapped", "x"));
        assert_eq!(classification.kind(), ErrorKind::Resource);
        assert_eq!(classification.message(), "Declared default: x");
    }

    #[rstest]
    fn missing_table_yields_null_exception_strategy() {
        let strategy = MappedErrorStrategy::unconfigured();
        assert!(!strategy.is_configured());
        let classification = strategy.classify(&Failure::new("Unmapped", "x"));
        assert_eq!(classification.kind(), ErrorKind::NullExceptionStrategy);
        assert_eq!(classification.message(), STRATEGY_MISSING_MESSAGE);
    }

    #[rstest]
    fn business_strategy_ignores_the_table() {
        let classification = BusinessStrategy::invalid_data().classify(&Failure::new(
            "StoreConflictError",
            "id must not be empty",
        ));
        assert_eq!(classification.kind(), ErrorKind::InvalidData);
        assert_eq!(classification.message(), "id must not be empty");
    }
}
