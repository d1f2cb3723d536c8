//! Public profile attached to a user.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ModelValidationError, compiled};
use crate::domain::entity::{
    Activatable, CursorOrdered, Entity, EntityId, Identifiable, TenantId, TenantScoped, Updatable,
};

/// Maximum biography length.
pub const BIO_MAX: usize = 512;

static LOCALE_RE: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_RE.get_or_init(|| compiled("^[a-z]{2,3}(-[A-Z]{2})?$"))
}

/// Caller-editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    /// Owning user.
    pub user_id: EntityId,
    /// Free-form biography; may be empty.
    pub bio: String,
    /// BCP 47 language tag such as `en-GB`.
    pub locale: String,
}

/// Profile of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    id: EntityId,
    tenant_id: TenantId,
    user_id: EntityId,
    bio: String,
    locale: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Profile {
    /// Validate `draft` and build an active profile.
    pub fn new(
        id: EntityId,
        tenant_id: TenantId,
        draft: ProfileDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelValidationError> {
        let bio = draft.bio.trim().to_owned();
        if bio.chars().count() > BIO_MAX {
            return Err(ModelValidationError::TooLong {
                field: "bio",
                max: BIO_MAX,
            });
        }
        if !locale_regex().is_match(&draft.locale) {
            return Err(ModelValidationError::InvalidLocale {
                value: draft.locale,
            });
        }
        Ok(Self {
            id,
            tenant_id,
            user_id: draft.user_id,
            bio,
            locale: draft.locale,
            is_active: true,
            created_at,
        })
    }

    /// Owning user.
    pub fn user_id(&self) -> EntityId {
        self.user_id
    }

    /// Biography.
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Language tag.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Identifiable for Profile {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Activatable for Profile {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl TenantScoped for Profile {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl Entity for Profile {
    const NAME: &'static str = "Profile";
}

impl Updatable for Profile {
    fn apply_updates(modified: Self, unmodified: &Self) -> Self {
        Self {
            bio: modified.bio,
            locale: modified.locale,
            ..unmodified.clone()
        }
    }
}

impl CursorOrdered for Profile {
    type Key = (DateTime<Utc>, EntityId);

    fn cursor_key(&self) -> Self::Key {
        (self.created_at, self.id)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("en")]
    #[case("en-GB")]
    #[case("fil")]
    fn well_formed_locales_are_accepted(#[case] locale: &str) {
        let draft = ProfileDraft {
            user_id: EntityId::new(),
            bio: String::new(),
            locale: locale.to_owned(),
        };
        assert!(Profile::new(EntityId::new(), TenantId::new(), draft, Utc::now()).is_ok());
    }

    #[rstest]
    #[case("EN")]
    #[case("en_GB")]
    #[case("")]
    fn malformed_locales_are_rejected(#[case] locale: &str) {
        let draft = ProfileDraft {
            user_id: EntityId::new(),
            bio: String::new(),
            locale: locale.to_owned(),
        };
        let err = Profile::new(EntityId::new(), TenantId::new(), draft, Utc::now())
            .expect_err("invalid locale");
        assert!(matches!(err, ModelValidationError::InvalidLocale { .. }));
    }

    #[rstest]
    fn updates_keep_the_owner() {
        let owner = EntityId::new();
        let stored = Profile::new(
            EntityId::new(),
            TenantId::new(),
            ProfileDraft {
                user_id: owner,
                bio: "old".to_owned(),
                locale: "en".to_owned(),
            },
            Utc::now(),
        )
        .expect("valid profile");
        let edited = Profile::new(
            EntityId::new(),
            TenantId::new(),
            ProfileDraft {
                user_id: EntityId::new(),
                bio: "new".to_owned(),
                locale: "fr-FR".to_owned(),
            },
            Utc::now(),
        )
        .expect("valid profile");

        let merged = Profile::apply_updates(edited, &stored);
        assert_eq!(merged.user_id(), owner);
        assert_eq!(merged.bio(), "new");
        assert_eq!(merged.locale(), "fr-FR");
    }
}
