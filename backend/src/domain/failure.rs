//! Tagged failure descriptions fed to error classification.

use std::borrow::Cow;

/// Failure type name used for domain-rule violations.
pub const BUSINESS_RULE_FAILURE: &str = "BusinessRuleViolation";

/// Failure type name used for malformed input.
pub const INVALID_DATA_FAILURE: &str = "InvalidDataFailure";

/// A failure identified by a stable type name plus free-form detail.
///
/// The type name is the lookup key into the error-mapping table; the detail
/// is substituted into the matched message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    type_name: Cow<'static, str>,
    detail: String,
}

impl Failure {
    /// Describe a failure of the given type.
    pub fn new(type_name: impl Into<Cow<'static, str>>, detail: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            detail: detail.into(),
        }
    }

    /// A domain-rule violation such as a missing entity.
    pub fn rule(detail: impl Into<String>) -> Self {
        Self::new(BUSINESS_RULE_FAILURE, detail)
    }

    /// Malformed caller input such as an empty identifier.
    pub fn invalid_data(detail: impl Into<String>) -> Self {
        Self::new(INVALID_DATA_FAILURE, detail)
    }

    /// Lookup key for classification.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Conversion implemented by errors that can be classified.
pub trait AsFailure {
    /// Describe `self` as a tagged failure.
    fn as_failure(&self) -> Failure;
}

impl AsFailure for Failure {
    fn as_failure(&self) -> Failure {
        self.clone()
    }
}
