//! Direct message between two users. Messages are immutable once sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ModelValidationError, require_text};
use crate::domain::entity::{
    Activatable, CursorOrdered, Entity, EntityId, Identifiable, TenantId, TenantScoped,
};

/// Maximum message body length.
pub const BODY_MAX: usize = 4_000;

/// Fields supplied when sending a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    /// Sending user.
    pub sender_id: EntityId,
    /// Receiving user.
    pub recipient_id: EntityId,
    /// Message text.
    pub body: String,
}

/// A sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: EntityId,
    tenant_id: TenantId,
    sender_id: EntityId,
    recipient_id: EntityId,
    body: String,
    is_active: bool,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Validate `draft` and build a visible message.
    pub fn new(
        id: EntityId,
        tenant_id: TenantId,
        draft: MessageDraft,
        sent_at: DateTime<Utc>,
    ) -> Result<Self, ModelValidationError> {
        let body = require_text("message body", draft.body, BODY_MAX)?;
        Ok(Self {
            id,
            tenant_id,
            sender_id: draft.sender_id,
            recipient_id: draft.recipient_id,
            body,
            is_active: true,
            sent_at,
        })
    }

    /// Sending user.
    pub fn sender_id(&self) -> EntityId {
        self.sender_id
    }

    /// Receiving user.
    pub fn recipient_id(&self) -> EntityId {
        self.recipient_id
    }

    /// Message text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Send timestamp.
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}

impl Identifiable for Message {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Activatable for Message {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl TenantScoped for Message {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl Entity for Message {
    const NAME: &'static str = "Message";
}

impl CursorOrdered for Message {
    type Key = (DateTime<Utc>, EntityId);

    fn cursor_key(&self) -> Self::Key {
        (self.sent_at, self.id)
    }
}
