//! Customer invoice.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ModelValidationError, compiled, require_text};
use crate::domain::entity::{
    Activatable, CursorOrdered, Entity, EntityId, Identifiable, TenantId, TenantScoped, Updatable,
};

/// Maximum invoice number length.
pub const NUMBER_MAX: usize = 32;

static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();

fn currency_regex() -> &'static Regex {
    CURRENCY_RE.get_or_init(|| compiled("^[A-Z]{3}$"))
}

/// Billing state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being prepared; not yet sent.
    Draft,
    /// Sent to the customer.
    Issued,
    /// Settled.
    Paid,
    /// Cancelled.
    Void,
}

impl InvoiceStatus {
    /// All statuses.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Issued, Self::Paid, Self::Void];

    /// Stable lowercase name.
    ///
    /// # Example
    ///
    /// ```
    /// # use tenant_backend::domain::models::InvoiceStatus;
    /// assert_eq!(InvoiceStatus::Paid.as_str(), "paid");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown invoice status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid invoice status '{input}'")]
pub struct ParseInvoiceStatusError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for InvoiceStatus {
    type Err = ParseInvoiceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseInvoiceStatusError {
                input: s.to_owned(),
            })
    }
}

/// Caller-editable invoice fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    /// User being billed.
    pub customer_id: EntityId,
    /// Human-facing invoice number.
    pub number: String,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
    /// Billing state.
    pub status: InvoiceStatus,
}

/// An invoice issued by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: EntityId,
    tenant_id: TenantId,
    customer_id: EntityId,
    number: String,
    amount_cents: i64,
    currency: String,
    status: InvoiceStatus,
    is_active: bool,
    issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Validate `draft` and build an active invoice.
    pub fn new(
        id: EntityId,
        tenant_id: TenantId,
        draft: InvoiceDraft,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, ModelValidationError> {
        let number = require_text("invoice number", draft.number, NUMBER_MAX)?;
        if draft.amount_cents < 0 {
            return Err(ModelValidationError::NegativeAmount);
        }
        if !currency_regex().is_match(&draft.currency) {
            return Err(ModelValidationError::InvalidCurrency {
                value: draft.currency,
            });
        }
        Ok(Self {
            id,
            tenant_id,
            customer_id: draft.customer_id,
            number,
            amount_cents: draft.amount_cents,
            currency: draft.currency,
            status: draft.status,
            is_active: true,
            issued_at,
        })
    }

    /// Billed user.
    pub fn customer_id(&self) -> EntityId {
        self.customer_id
    }

    /// Invoice number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Amount in minor units.
    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    /// Currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Billing state.
    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Issue timestamp.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Current editable fields.
    pub fn to_draft(&self) -> InvoiceDraft {
        InvoiceDraft {
            customer_id: self.customer_id,
            number: self.number.clone(),
            amount_cents: self.amount_cents,
            currency: self.currency.clone(),
            status: self.status,
        }
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Activatable for Invoice {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl TenantScoped for Invoice {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl Entity for Invoice {
    const NAME: &'static str = "Invoice";
}

impl Updatable for Invoice {
    // The customer and number are fixed once issued.
    fn apply_updates(modified: Self, unmodified: &Self) -> Self {
        Self {
            amount_cents: modified.amount_cents,
            currency: modified.currency,
            status: modified.status,
            ..unmodified.clone()
        }
    }
}

impl CursorOrdered for Invoice {
    type Key = (DateTime<Utc>, EntityId);

    fn cursor_key(&self) -> Self::Key {
        (self.issued_at, self.id)
    }
}
