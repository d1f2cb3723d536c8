//! Tenant user account.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ModelValidationError, compiled, require_text};
use crate::domain::entity::{
    Activatable, CursorOrdered, Entity, EntityId, Identifiable, TenantId, TenantScoped, Updatable,
};

/// Maximum display name length.
pub const DISPLAY_NAME_MAX: usize = 64;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    // Shape check only; deliverability is not our concern.
    EMAIL_RE.get_or_init(|| compiled(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"))
}

/// Caller-editable user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    /// Name shown to other users.
    pub display_name: String,
    /// Contact address.
    pub email: String,
}

/// A user belonging to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: EntityId,
    tenant_id: TenantId,
    display_name: String,
    email: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Validate `draft` and build an active user.
    pub fn new(
        id: EntityId,
        tenant_id: TenantId,
        draft: UserDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelValidationError> {
        let display_name = require_text("display name", draft.display_name, DISPLAY_NAME_MAX)?;
        let email = draft.email.trim().to_ascii_lowercase();
        if !email_regex().is_match(&email) {
            return Err(ModelValidationError::InvalidEmail { value: draft.email });
        }
        Ok(Self {
            id,
            tenant_id,
            display_name,
            email,
            is_active: true,
            created_at,
        })
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current editable fields.
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Activatable for User {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl TenantScoped for User {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl Entity for User {
    const NAME: &'static str = "User";
}

impl Updatable for User {
    fn apply_updates(modified: Self, unmodified: &Self) -> Self {
        Self {
            display_name: modified.display_name,
            email: modified.email,
            ..unmodified.clone()
        }
    }
}

impl CursorOrdered for User {
    type Key = (String, EntityId);

    fn cursor_key(&self) -> Self::Key {
        (self.display_name.to_lowercase(), self.id)
    }
}
