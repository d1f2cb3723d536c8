//! Entity identity and the capability contracts repositories rely on.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use uuid::fmt::Hyphenated;

/// Validation errors for identifier strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdError {
    /// The input was empty or whitespace.
    #[error("id must not be empty")]
    Empty,
    /// The input was not a canonical hyphenated UUID.
    #[error("id '{input}' is not a canonical UUID")]
    Malformed {
        /// The rejected input.
        input: String,
    },
}

fn parse_canonical(input: &str) -> Result<Uuid, EntityIdError> {
    if input.trim().is_empty() {
        return Err(EntityIdError::Empty);
    }
    let malformed = || EntityIdError::Malformed {
        input: input.to_owned(),
    };
    // Uuid::parse_str also accepts simple, braced and URN forms.
    if input.len() != Hyphenated::LENGTH {
        return Err(malformed());
    }
    Uuid::parse_str(input).map_err(|_| malformed())
}

/// Stable entity identifier: a UUID assigned at creation.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::{EntityId, EntityIdError};
///
/// let id = EntityId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").expect("canonical");
/// assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
/// assert_eq!(EntityId::parse("  "), Err(EntityIdError::Empty));
/// assert!(EntityId::parse("NOT_ID").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a canonical hyphenated UUID string.
    pub fn parse(input: &str) -> Result<Self, EntityIdError> {
        parse_canonical(input).map(Self)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Tenant owning a set of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(Uuid);

impl TenantId {
    /// Generate a fresh random tenant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a canonical hyphenated UUID string.
    pub fn parse(input: &str) -> Result<Self, EntityIdError> {
        parse_canonical(input).map(Self)
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TenantId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Has a stable identifier.
pub trait Identifiable {
    /// The identifier assigned at creation.
    fn id(&self) -> EntityId;
}

/// Has an active/inactive flag.
pub trait Activatable {
    /// Whether the record is active.
    fn is_active(&self) -> bool;
    /// Set the active flag.
    fn set_active(&mut self, active: bool);
}

/// A record the repositories can store.
pub trait Entity: Identifiable + Activatable + Clone + fmt::Debug + Send + Sync + 'static {
    /// Name used in messages such as "User not found".
    const NAME: &'static str;
}

/// Belongs to a tenant.
pub trait TenantScoped {
    /// Owning tenant.
    fn tenant_id(&self) -> TenantId;
}

/// Entities whose caller-editable fields can be merged onto a stored record.
pub trait Updatable: Entity {
    /// Copy the caller-editable fields of `modified` onto `unmodified`.
    ///
    /// Identifiers, tenant and system timestamps always come from
    /// `unmodified`.
    fn apply_updates(modified: Self, unmodified: &Self) -> Self;
}

/// Entities with a total order suitable for cursor pagination.
pub trait CursorOrdered: Entity {
    /// Sort key. Must be injective over stored rows, so it ends in the id.
    type Key: Ord + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Key of this row.
    fn cursor_key(&self) -> Self::Key;
}
