//! Closed taxonomy of failure categories.
//!
//! Every failed [`crate::domain::Operation`] carries exactly one
//! [`ErrorKind`]. Callers branch on the kind, never on the concrete failure
//! that produced it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Failure category attached to every failed operation.
///
/// The serialised form is the stable name, e.g. `"BusinessValidation"`.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::ErrorKind;
///
/// assert!(!ErrorKind::None.is_failure());
/// assert!(ErrorKind::Database.is_failure());
/// assert_eq!(ErrorKind::NotFound.name(), "NotFound");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No failure; only ever attached to successful operations.
    None,
    /// A domain rule rejected the request.
    BusinessValidation,
    /// The data store failed.
    Database,
    /// A downstream service failed.
    ExternalService,
    /// Anything not covered by a more specific kind.
    Unexpected,
    /// Input or persisted data is malformed.
    InvalidData,
    /// Required configuration is absent.
    ConfigMissing,
    /// Transport-level failure.
    Network,
    /// The caller supplied unusable input.
    UserInput,
    /// The addressed resource does not exist.
    NotFound,
    /// The caller could not be identified.
    Authentication,
    /// The caller may not perform the action.
    Authorization,
    /// A resource limit was hit.
    Resource,
    /// The operation ran out of time.
    Timeout,
    /// No classification table was loaded, so the failure could not be
    /// classified.
    NullExceptionStrategy,
}

/// Stable name and human description of an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKindMetadata {
    name: &'static str,
    description: &'static str,
}

impl ErrorKindMetadata {
    /// Fallback returned for names or kinds absent from the table.
    pub const UNKNOWN: Self = Self {
        name: "Unknown",
        description: "Unknown error",
    };

    /// Stable machine-readable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

const METADATA: [(ErrorKind, &str, &str); 15] = [
    (ErrorKind::None, "None", "No error"),
    (
        ErrorKind::BusinessValidation,
        "BusinessValidation",
        "A business rule rejected the request",
    ),
    (ErrorKind::Database, "Database", "The data store reported an error"),
    (
        ErrorKind::ExternalService,
        "ExternalService",
        "An external service reported an error",
    ),
    (ErrorKind::Unexpected, "Unexpected", "An unexpected error occurred"),
    (ErrorKind::InvalidData, "InvalidData", "The data is invalid"),
    (
        ErrorKind::ConfigMissing,
        "ConfigMissing",
        "Required configuration is missing",
    ),
    (ErrorKind::Network, "Network", "A network error occurred"),
    (ErrorKind::UserInput, "UserInput", "The user input is invalid"),
    (ErrorKind::NotFound, "NotFound", "The resource was not found"),
    (
        ErrorKind::Authentication,
        "Authentication",
        "Authentication failed",
    ),
    (
        ErrorKind::Authorization,
        "Authorization",
        "The caller is not authorised for this action",
    ),
    (ErrorKind::Resource, "Resource", "A resource limit was reached"),
    (ErrorKind::Timeout, "Timeout", "The operation timed out"),
    (
        ErrorKind::NullExceptionStrategy,
        "NullExceptionStrategy",
        "No error classification strategy is configured",
    ),
];

static METADATA_BY_KIND: OnceLock<HashMap<ErrorKind, ErrorKindMetadata>> = OnceLock::new();

fn metadata_table() -> &'static HashMap<ErrorKind, ErrorKindMetadata> {
    METADATA_BY_KIND.get_or_init(|| {
        METADATA
            .iter()
            .map(|&(kind, name, description)| (kind, ErrorKindMetadata { name, description }))
            .collect()
    })
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::None,
        Self::BusinessValidation,
        Self::Database,
        Self::ExternalService,
        Self::Unexpected,
        Self::InvalidData,
        Self::ConfigMissing,
        Self::Network,
        Self::UserInput,
        Self::NotFound,
        Self::Authentication,
        Self::Authorization,
        Self::Resource,
        Self::Timeout,
        Self::NullExceptionStrategy,
    ];

    /// Whether this kind represents a failure.
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Name and description for this kind.
    pub fn metadata(self) -> ErrorKindMetadata {
        metadata_table()
            .get(&self)
            .copied()
            .unwrap_or(ErrorKindMetadata::UNKNOWN)
    }

    /// Stable machine-readable name.
    pub fn name(self) -> &'static str {
        self.metadata().name()
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        self.metadata().description()
    }

    /// Parse a stable name, returning `None` when unrecognised.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Metadata for a stable name, falling back to
/// [`ErrorKindMetadata::UNKNOWN`] when the name is unrecognised.
pub fn metadata_for_name(name: &str) -> ErrorKindMetadata {
    ErrorKind::from_name(name).map_or(ErrorKindMetadata::UNKNOWN, ErrorKind::metadata)
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognised kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind '{input}'")]
pub struct ParseErrorKindError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for ErrorKind {
    type Err = ParseErrorKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseErrorKindError {
            input: s.to_owned(),
        })
    }
}
