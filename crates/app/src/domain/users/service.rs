//! User directory service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::{
    domain::users::{
        data::NewUser, errors::UsersServiceError, records::UserRecord,
        repository::PgUsersRepository,
    },
    ids::NationalId,
};

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    repository: PgUsersRepository,
}

impl PgUserDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn resolve_user(&self, national_id: &NationalId) -> Result<UserRecord, UsersServiceError> {
        self.repository
            .get_user(national_id)
            .await?
            .ok_or(UsersServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "users.service.register_user",
        skip(self, user),
        fields(national_id = %user.national_id),
        err
    )]
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let record = self.repository.create_user(user).await?;

        info!(national_id = %record.national_id, "registered user");

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Known users of the system.
pub trait UserDirectory: Send + Sync {
    /// Look up a user by national identity number.
    async fn resolve_user(&self, national_id: &NationalId) -> Result<UserRecord, UsersServiceError>;

    /// Registers a new user.
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn resolve_user_returns_registered_user() -> TestResult {
        let ctx = TestContext::new().await;
        let national_id = NationalId::new("1100700000001");

        ctx.users
            .register_user(NewUser {
                national_id: national_id.clone(),
                display_name: "Somchai".to_string(),
            })
            .await?;

        let user = ctx.users.resolve_user(&national_id).await?;

        assert_eq!(user.national_id, national_id);
        assert_eq!(user.display_name, "Somchai");

        Ok(())
    }

    #[tokio::test]
    async fn resolve_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.resolve_user(&NationalId::new("nobody")).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn register_duplicate_user_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let user = NewUser {
            national_id: NationalId::new("dup"),
            display_name: "First".to_string(),
        };

        ctx.users.register_user(user.clone()).await?;

        let result = ctx.users.register_user(user).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn register_empty_national_id_returns_invalid_data() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .register_user(NewUser {
                national_id: NationalId::new(""),
                display_name: "Nobody".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
