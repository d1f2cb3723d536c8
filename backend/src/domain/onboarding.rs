//! Multi-step onboarding: a user and their profile in one transaction.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::entity::{EntityId, Identifiable, TenantId};
use crate::domain::error_strategy::{BusinessStrategy, ErrorStrategy};
use crate::domain::failure::Failure;
use crate::domain::models::{ModelValidationError, Profile, ProfileDraft, User, UserDraft};
use crate::domain::operation::Operation;
use crate::domain::ports::{EntityStore, UnitOfWork};
use crate::domain::repository::{
    Create, OperationScope, ProfileRepository, UserRepository, store_failure,
};

/// Input for [`OnboardingService::onboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingRequest {
    /// Tenant the new user joins.
    pub tenant_id: TenantId,
    /// Account fields.
    pub user: UserDraft,
    /// Initial biography.
    pub bio: String,
    /// Preferred locale tag.
    pub locale: String,
}

/// Creates a user and profile atomically.
pub struct OnboardingService<U> {
    uow: Arc<U>,
    strategy: Arc<dyn ErrorStrategy>,
    users: UserRepository<U>,
    profiles: ProfileRepository<U>,
    clock: Arc<dyn Clock>,
}

fn rejected<T>(error: &ModelValidationError) -> Operation<T> {
    Operation::fail(
        &Failure::invalid_data(error.to_string()),
        &BusinessStrategy::invalid_data(),
    )
}

impl<U> OnboardingService<U>
where
    U: UnitOfWork + EntityStore<User> + EntityStore<Profile>,
{
    /// Service writing through `scope`'s unit of work.
    pub fn new(scope: &OperationScope<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            uow: Arc::clone(scope.unit_of_work()),
            strategy: Arc::clone(scope.strategy()),
            users: scope.users(),
            profiles: scope.profiles(),
            clock,
        }
    }

    /// Create the user and profile, or neither.
    ///
    /// Invalid input fails with `InvalidData` before the store is touched.
    /// Any failure after the transaction opens rolls it back.
    pub async fn onboard(&self, request: OnboardingRequest) -> Operation<(User, Profile)> {
        let now = self.clock.utc();
        let user = match User::new(EntityId::new(), request.tenant_id, request.user, now) {
            Ok(user) => user,
            Err(error) => return rejected(&error),
        };
        let profile_draft = ProfileDraft {
            user_id: user.id(),
            bio: request.bio,
            locale: request.locale,
        };
        let profile = match Profile::new(EntityId::new(), request.tenant_id, profile_draft, now) {
            Ok(profile) => profile,
            Err(error) => return rejected(&error),
        };

        if let Err(error) = self.uow.begin_transaction().await {
            return store_failure(self.strategy.as_ref(), "begin onboarding", &error);
        }

        let created = self.users.create(user).await;
        let user = match created.into_result() {
            Ok(user) => user,
            Err(failure) => return self.abort(Operation::from(failure)).await,
        };
        let created = self.profiles.create(profile).await;
        let profile = match created.into_result() {
            Ok(profile) => profile,
            Err(failure) => return self.abort(Operation::from(failure)).await,
        };

        if let Err(error) = self.uow.commit_transaction().await {
            let failed = store_failure(self.strategy.as_ref(), "commit onboarding", &error);
            return self.abort(failed).await;
        }

        info!(user_id = %user.id(), tenant_id = %request.tenant_id, "user onboarded");
        Operation::success_with_message((user, profile), "User onboarded")
    }

    async fn abort<T: Send>(&self, failed: Operation<T>) -> Operation<T> {
        if let Err(error) = self.uow.rollback().await {
            warn!(%error, "onboarding rollback failed");
        }
        failed
    }
}

#[cfg(test)]
#[path = "onboarding_tests.rs"]
mod tests;
