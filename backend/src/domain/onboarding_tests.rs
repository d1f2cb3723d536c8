//! Unit tests for transactional onboarding.

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorKind;
use crate::domain::error_strategy::MappedErrorStrategy;
use crate::domain::ports::StoreError;
use crate::outbound::memory::{InMemoryDatabase, InMemoryUnitOfWork};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .single()
        .expect("fixture timestamp")
}

#[fixture]
fn db() -> InMemoryDatabase {
    InMemoryDatabase::new()
}

fn service(db: &InMemoryDatabase) -> OnboardingService<InMemoryUnitOfWork> {
    let scope = db.scope(Arc::new(MappedErrorStrategy::unconfigured()), 50);
    OnboardingService::new(
        &scope,
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    )
}

fn request(locale: &str) -> OnboardingRequest {
    OnboardingRequest {
        tenant_id: TenantId::new(),
        user: UserDraft {
            display_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
        },
        bio: "Analyst".to_owned(),
        locale: locale.to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn onboarding_commits_user_and_profile_together(db: InMemoryDatabase) {
    let op = service(&db).onboard(request("en-GB")).await;

    assert!(op.is_successful(), "{}", op.message());
    assert_eq!(op.message(), "User onboarded");
    let (user, profile) = op.into_data().expect("onboarded pair");
    assert_eq!(profile.user_id(), user.id());
    assert_eq!(user.created_at(), fixture_timestamp());
    assert_eq!(db.committed::<User>(), vec![user]);
    assert_eq!(db.committed::<Profile>(), vec![profile]);
}

#[rstest]
#[tokio::test]
async fn invalid_input_is_rejected_before_the_store(db: InMemoryDatabase) {
    let op = service(&db).onboard(request("English")).await;

    assert_eq!(op.error_kind(), ErrorKind::InvalidData);
    assert_eq!(db.round_trips(), 0);
}

#[rstest]
#[case::profile_write(2)]
#[case::final_commit(3)]
#[tokio::test]
async fn a_failed_step_rolls_back_every_write(db: InMemoryDatabase, #[case] passing: usize) {
    db.inject_fault_after(passing, StoreError::timeout("injected"));

    let op = service(&db).onboard(request("en")).await;

    assert_eq!(op.error_kind(), ErrorKind::NullExceptionStrategy);
    assert!(db.committed::<User>().is_empty());
    assert!(db.committed::<Profile>().is_empty());
}
