//! Error-mapping table loaded from JSON.
//!
//! The table maps failure type names (see [`crate::domain::Failure`]) to an
//! [`ErrorKind`] and a message template. It is validated once at load and is
//! immutable afterwards; reloading builds a new table and swaps it in whole.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": 1,
//!   "default": { "kind": "Unexpected", "message": "Unexpected failure: {detail}" },
//!   "entries": [
//!     { "failure": "StoreQueryError", "kind": "Database", "message": "Query failed: {detail}" }
//!   ]
//! }
//! ```
//!
//! `{detail}` in a template is replaced with the failure's detail text.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::error_kind::ErrorKind;

/// Mapping file version understood by this build.
pub const SUPPORTED_VERSION: u32 = 1;

/// Placeholder replaced with the failure detail when rendering a template.
pub const DETAIL_PLACEHOLDER: &str = "{detail}";

/// Template used when a file declares no `default` entry.
pub const FALLBACK_TEMPLATE: &str = "An unexpected error occurred: {detail}";

/// Errors raised while loading an error-mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorMappingError {
    /// The mapping file could not be read.
    #[error("failed to read error mapping file at '{path}': {message}")]
    Io {
        /// Path to the mapping file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The document is not valid JSON or is missing required fields.
    #[error("invalid error mapping JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// The document declares an unsupported version.
    #[error("unsupported error mapping version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Supported version.
        expected: u32,
        /// Declared version.
        actual: u32,
    },

    /// An entry names a kind outside the taxonomy.
    #[error("entry '{failure}' names unknown error kind '{kind}'")]
    UnknownKind {
        /// Failure name of the offending entry.
        failure: String,
        /// Rejected kind name.
        kind: String,
    },

    /// An entry maps a failure to `None`.
    #[error("entry '{failure}' must map to a failure kind, not None")]
    NonFailureKind {
        /// Failure name of the offending entry.
        failure: String,
    },

    /// A failure name appears more than once.
    #[error("failure '{failure}' is mapped more than once")]
    DuplicateEntry {
        /// The repeated failure name.
        failure: String,
    },

    /// An entry has a blank failure name.
    #[error("entry at index {index} has an empty failure name")]
    EmptyFailureName {
        /// Position of the entry in the file.
        index: usize,
    },

    /// An entry has a blank message template.
    #[error("entry '{failure}' has an empty message template")]
    EmptyTemplate {
        /// Failure name of the offending entry.
        failure: String,
    },
}

/// Classification outcome for one failure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMappingEntry {
    kind: ErrorKind,
    template: String,
}

impl ErrorMappingEntry {
    /// Validate and build an entry.
    ///
    /// `label` identifies the entry in error messages.
    pub fn new(
        label: &str,
        kind: ErrorKind,
        template: impl Into<String>,
    ) -> Result<Self, ErrorMappingError> {
        let template = template.into();
        if !kind.is_failure() {
            return Err(ErrorMappingError::NonFailureKind {
                failure: label.to_owned(),
            });
        }
        if template.trim().is_empty() {
            return Err(ErrorMappingError::EmptyTemplate {
                failure: label.to_owned(),
            });
        }
        Ok(Self { kind, template })
    }

    /// Kind assigned to matching failures.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Raw message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template for a failure detail.
    pub fn render(&self, detail: &str) -> String {
        self.template.replace(DETAIL_PLACEHOLDER, detail)
    }
}

/// Immutable failure-name to classification table.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::{ErrorKind, ErrorMappingTable};
///
/// let table = ErrorMappingTable::from_json(r#"{
///     "version": 1,
///     "default": { "kind": "Unexpected", "message": "Failed: {detail}" },
///     "entries": [
///         { "failure": "StoreTimeoutError", "kind": "Timeout", "message": "Timed out: {detail}" }
///     ]
/// }"#).expect("valid table");
///
/// assert_eq!(table.resolve("StoreTimeoutError").kind(), ErrorKind::Timeout);
/// assert_eq!(table.resolve("SomethingElse").kind(), ErrorKind::Unexpected);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMappingTable {
    entries: HashMap<String, ErrorMappingEntry>,
    default: ErrorMappingEntry,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMappingTable {
    version: u32,
    #[serde(default)]
    default: Option<RawDefaultEntry>,
    #[serde(default)]
    entries: Vec<RawMappingEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaultEntry {
    kind: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMappingEntry {
    failure: String,
    kind: String,
    message: String,
}

fn parse_kind(failure: &str, raw: String) -> Result<ErrorKind, ErrorMappingError> {
    ErrorKind::from_name(&raw).ok_or_else(|| ErrorMappingError::UnknownKind {
        failure: failure.to_owned(),
        kind: raw,
    })
}

impl ErrorMappingTable {
    /// Label used for the default entry in error messages.
    pub const DEFAULT_LABEL: &'static str = "default";

    /// Build a table from validated parts.
    pub fn new(
        entries: impl IntoIterator<Item = (String, ErrorMappingEntry)>,
        default: ErrorMappingEntry,
    ) -> Result<Self, ErrorMappingError> {
        let mut map = HashMap::new();
        for (index, (failure, entry)) in entries.into_iter().enumerate() {
            if failure.trim().is_empty() {
                return Err(ErrorMappingError::EmptyFailureName { index });
            }
            if map.contains_key(&failure) {
                return Err(ErrorMappingError::DuplicateEntry { failure });
            }
            map.insert(failure, entry);
        }
        Ok(Self {
            entries: map,
            default,
        })
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ErrorMappingError> {
        let raw: RawMappingTable =
            serde_json::from_str(json).map_err(|e| ErrorMappingError::Parse {
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Read and validate a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ErrorMappingError> {
        let contents = fs::read_to_string(path).map_err(|e| ErrorMappingError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    fn from_raw(raw: RawMappingTable) -> Result<Self, ErrorMappingError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(ErrorMappingError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let default = match raw.default {
            Some(entry) => {
                let kind = parse_kind(Self::DEFAULT_LABEL, entry.kind)?;
                ErrorMappingEntry::new(Self::DEFAULT_LABEL, kind, entry.message)?
            }
            None => {
                ErrorMappingEntry::new(Self::DEFAULT_LABEL, ErrorKind::Unexpected, FALLBACK_TEMPLATE)?
            }
        };

        let entries = raw
            .entries
            .into_iter()
            .map(|entry| {
                let kind = parse_kind(&entry.failure, entry.kind)?;
                let mapped = ErrorMappingEntry::new(&entry.failure, kind, entry.message)?;
                Ok((entry.failure, mapped))
            })
            .collect::<Result<Vec<_>, ErrorMappingError>>()?;

        Self::new(entries, default)
    }

    /// Exact match for a failure type name.
    pub fn lookup(&self, failure: &str) -> Option<&ErrorMappingEntry> {
        self.entries.get(failure)
    }

    /// Exact match, falling back to the declared default.
    pub fn resolve(&self, failure: &str) -> &ErrorMappingEntry {
        self.lookup(failure).unwrap_or(&self.default)
    }

    /// The declared default entry.
    pub fn default_entry(&self) -> &ErrorMappingEntry {
        &self.default
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit entries sorted by failure name.
    pub fn sorted_entries(&self) -> Vec<(&str, &ErrorMappingEntry)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(failure, entry)| (failure.as_str(), entry))
            .collect();
        entries.sort_unstable_by_key(|(failure, _)| *failure);
        entries
    }
}

#[cfg(test)]
#[path = "error_mapping_tests.rs"]
mod tests;
