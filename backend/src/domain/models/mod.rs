//! Tenant-scoped entities stored through the generic repositories.

mod invoice;
mod message;
mod profile;
mod user;

pub use invoice::{Invoice, InvoiceDraft, InvoiceStatus, ParseInvoiceStatusError};
pub use message::{Message, MessageDraft};
pub use profile::{Profile, ProfileDraft};
pub use user::{User, UserDraft};

/// Field validation errors raised when building a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeded its length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// An email address was malformed.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail {
        /// Rejected value.
        value: String,
    },
    /// A currency code was not three upper-case letters.
    #[error("'{value}' is not an ISO 4217 currency code")]
    InvalidCurrency {
        /// Rejected value.
        value: String,
    },
    /// A locale tag was malformed.
    #[error("'{value}' is not a valid locale tag")]
    InvalidLocale {
        /// Rejected value.
        value: String,
    },
    /// A monetary amount was negative.
    #[error("amount must not be negative")]
    NegativeAmount,
}

pub(crate) fn require_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > max {
        return Err(ModelValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn compiled(pattern: &'static str) -> regex::Regex {
    regex::Regex::new(pattern)
        .unwrap_or_else(|error| panic!("pattern {pattern} failed to compile: {error}"))
}
