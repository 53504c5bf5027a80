//! Usage log service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::{
    domain::{
        rentals::records::LockerInstanceRecord,
        usages::{errors::UsagesServiceError, records::UsageRecord, repository::PgUsagesRepository},
        users::records::UserRecord,
    },
    ids::{InstanceKey, UsageUuid},
};

#[derive(Debug, Clone)]
pub struct PgUsageLog {
    repository: PgUsagesRepository,
}

impl PgUsageLog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsagesRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsageLog for PgUsageLog {
    #[tracing::instrument(
        name = "usages.service.record_unlock",
        skip(self, instance, user),
        fields(instance = %instance.key(), national_id = %user.national_id),
        err
    )]
    async fn record_unlock(
        &self,
        instance: &LockerInstanceRecord,
        user: &UserRecord,
    ) -> Result<UsageRecord, UsagesServiceError> {
        let usage = self
            .repository
            .create_usage(UsageUuid::new(), instance.key(), &user.national_id)
            .await?
            .ok_or(UsagesServiceError::NoActiveGrant)?;

        info!(usage_uuid = %usage.uuid, "recorded unlock");

        Ok(usage)
    }

    async fn list_usages(&self, instance: InstanceKey) -> Result<Vec<UsageRecord>, UsagesServiceError> {
        self.repository
            .list_usages(instance)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Records every unlock performed on a rental.
pub trait UsageLog: Send + Sync {
    /// Logs an unlock of `instance` by `user`.
    ///
    /// The grant check and the insert are one statement: a grant revoked or a rental
    /// closed after the caller's own check yields [`UsagesServiceError::NoActiveGrant`].
    async fn record_unlock(
        &self,
        instance: &LockerInstanceRecord,
        user: &UserRecord,
    ) -> Result<UsageRecord, UsagesServiceError>;

    /// Unlocks logged against one rental, oldest first.
    async fn list_usages(&self, instance: InstanceKey) -> Result<Vec<UsageRecord>, UsagesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            rentals::{RentalsService, RentalsServiceError, data::InstanceRelations},
            users::UserDirectory,
        },
        ids::LockerId,
        test::{
            TestContext,
            helpers::{seed_locker, seed_user},
        },
    };

    use super::*;

    async fn active_instance(ctx: &TestContext) -> Result<LockerInstanceRecord, RentalsServiceError> {
        Ok(ctx
            .rentals
            .get_active_instance(LockerId::new(42), InstanceRelations::NONE)
            .await?
            .instance)
    }

    #[tokio::test]
    async fn record_unlock_with_live_grant_is_logged() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "U1").await?;

        seed_locker(&ctx, 42, "ABC").await?;

        ctx.rentals.open_rental("ABC", &owner).await?;

        let instance = active_instance(&ctx).await?;
        let user = ctx.users.resolve_user(&owner).await?;

        let usage = ctx.usages.record_unlock(&instance, &user).await?;

        assert_eq!(usage.instance, instance.key());
        assert_eq!(usage.national_id, owner);
        let logged = ctx.usages.list_usages(instance.key()).await?;

        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].uuid, usage.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn record_unlock_after_revoke_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "U1").await?;
        let guest = seed_user(&ctx, "U2").await?;

        seed_locker(&ctx, 42, "ABC").await?;

        ctx.rentals.open_rental("ABC", &owner).await?;
        ctx.rentals.grant_access(LockerId::new(42), &guest).await?;

        // State as seen by a caller that checked the grant just before the revoke.
        let instance = active_instance(&ctx).await?;
        let user = ctx.users.resolve_user(&guest).await?;

        ctx.rentals
            .revoke_access(&owner, &guest, LockerId::new(42))
            .await?;

        let result = ctx.usages.record_unlock(&instance, &user).await;

        assert!(
            matches!(result, Err(UsagesServiceError::NoActiveGrant)),
            "expected NoActiveGrant, got {result:?}"
        );
        assert!(ctx.usages.list_usages(instance.key()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn record_unlock_on_closed_rental_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "U1").await?;

        seed_locker(&ctx, 42, "ABC").await?;

        ctx.rentals.open_rental("ABC", &owner).await?;

        let instance = active_instance(&ctx).await?;
        let user = ctx.users.resolve_user(&owner).await?;

        ctx.rentals.close_rental(&owner, "ABC").await?;

        let result = ctx.usages.record_unlock(&instance, &user).await;

        assert!(
            matches!(result, Err(UsagesServiceError::NoActiveGrant)),
            "expected NoActiveGrant, got {result:?}"
        );
        assert!(ctx.usages.list_usages(instance.key()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn record_unlock_by_stranger_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = seed_user(&ctx, "U1").await?;
        let stranger = seed_user(&ctx, "U2").await?;

        seed_locker(&ctx, 42, "ABC").await?;

        ctx.rentals.open_rental("ABC", &owner).await?;

        let instance = active_instance(&ctx).await?;
        let user = ctx.users.resolve_user(&stranger).await?;

        let result = ctx.usages.record_unlock(&instance, &user).await;

        assert!(
            matches!(result, Err(UsagesServiceError::NoActiveGrant)),
            "expected NoActiveGrant, got {result:?}"
        );

        Ok(())
    }
}
