//! Test Helpers

use crate::{
    domain::{
        lockers::{
            LockerDirectory, LockersServiceError,
            data::NewLocker,
            records::{LockerRecord, LockerStatus},
        },
        users::{UserDirectory, UsersServiceError, data::NewUser},
    },
    ids::{LockerId, NationalId},
    test::TestContext,
};

/// Register an active locker.
pub(crate) async fn seed_locker(
    ctx: &TestContext,
    id: i64,
    access_code: &str,
) -> Result<LockerRecord, LockersServiceError> {
    ctx.lockers
        .register_locker(NewLocker {
            id: LockerId::new(id),
            access_code: access_code.to_string(),
            status: LockerStatus::Active,
        })
        .await
}

/// Register a user and return their id.
pub(crate) async fn seed_user(
    ctx: &TestContext,
    national_id: &str,
) -> Result<NationalId, UsersServiceError> {
    let user = ctx
        .users
        .register_user(NewUser {
            national_id: NationalId::new(national_id),
            display_name: format!("User {national_id}"),
        })
        .await?;

    Ok(user.national_id)
}
