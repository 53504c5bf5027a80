//! Locker directory service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::{
    domain::lockers::{
        data::NewLocker,
        errors::LockersServiceError,
        records::{LockerRecord, LockerStatus},
        repository::PgLockersRepository,
    },
    ids::LockerId,
};

#[derive(Debug, Clone)]
pub struct PgLockerDirectory {
    repository: PgLockersRepository,
}

impl PgLockerDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgLockersRepository::new(pool),
        }
    }
}

#[async_trait]
impl LockerDirectory for PgLockerDirectory {
    async fn resolve_by_access_code(
        &self,
        access_code: &str,
    ) -> Result<LockerRecord, LockersServiceError> {
        self.repository
            .find_by_access_code(access_code)
            .await?
            .ok_or(LockersServiceError::NotFound)
    }

    async fn is_active(&self, locker: LockerId) -> Result<bool, LockersServiceError> {
        Ok(self
            .repository
            .get_locker(locker)
            .await?
            .is_some_and(|record| record.is_active()))
    }

    #[tracing::instrument(
        name = "lockers.service.register_locker",
        skip(self, locker),
        fields(locker_id = %locker.id),
        err
    )]
    async fn register_locker(&self, locker: NewLocker) -> Result<LockerRecord, LockersServiceError> {
        let record = self.repository.create_locker(locker).await?;

        info!(locker_id = %record.id, status = %record.status, "registered locker");

        Ok(record)
    }

    #[tracing::instrument(
        name = "lockers.service.set_status",
        skip(self),
        fields(locker_id = %locker, status = %status),
        err
    )]
    async fn set_status(
        &self,
        locker: LockerId,
        status: LockerStatus,
    ) -> Result<LockerRecord, LockersServiceError> {
        self.repository
            .update_status(locker, status)
            .await?
            .ok_or(LockersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
/// Maps access codes to lockers and reports deployment status.
pub trait LockerDirectory: Send + Sync {
    /// Resolve the locker behind an access code.
    async fn resolve_by_access_code(
        &self,
        access_code: &str,
    ) -> Result<LockerRecord, LockersServiceError>;

    /// Whether the locker is deployed; unknown lockers are not.
    async fn is_active(&self, locker: LockerId) -> Result<bool, LockersServiceError>;

    /// Registers a new locker.
    async fn register_locker(&self, locker: NewLocker) -> Result<LockerRecord, LockersServiceError>;

    /// Changes a locker's deployment status.
    async fn set_status(
        &self,
        locker: LockerId,
        status: LockerStatus,
    ) -> Result<LockerRecord, LockersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_locker(id: i64, access_code: &str) -> NewLocker {
        NewLocker {
            id: LockerId::new(id),
            access_code: access_code.to_string(),
            status: LockerStatus::Active,
        }
    }

    #[tokio::test]
    async fn resolve_by_access_code_returns_registered_locker() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.lockers.register_locker(new_locker(42, "ABC")).await?;

        let locker = ctx.lockers.resolve_by_access_code("ABC").await?;

        assert_eq!(locker.id, LockerId::new(42));
        assert_eq!(locker.access_code, "ABC");
        assert!(locker.is_active());

        Ok(())
    }

    #[tokio::test]
    async fn resolve_unknown_access_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.lockers.resolve_by_access_code("missing").await;

        assert!(
            matches!(result, Err(LockersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn register_duplicate_access_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.lockers.register_locker(new_locker(1, "SAME")).await?;

        let result = ctx.lockers.register_locker(new_locker(2, "SAME")).await;

        assert!(
            matches!(result, Err(LockersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn is_active_follows_status_changes() -> TestResult {
        let ctx = TestContext::new().await;
        let id = LockerId::new(7);

        ctx.lockers.register_locker(new_locker(7, "SEVEN")).await?;

        assert!(ctx.lockers.is_active(id).await?);

        let updated = ctx.lockers.set_status(id, LockerStatus::Inactive).await?;

        assert_eq!(updated.status, LockerStatus::Inactive);
        assert!(!ctx.lockers.is_active(id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn is_active_unknown_locker_is_false() -> TestResult {
        let ctx = TestContext::new().await;

        assert!(!ctx.lockers.is_active(LockerId::new(999)).await?);

        Ok(())
    }

    #[tokio::test]
    async fn set_status_unknown_locker_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .lockers
            .set_status(LockerId::new(999), LockerStatus::Active)
            .await;

        assert!(
            matches!(result, Err(LockersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
