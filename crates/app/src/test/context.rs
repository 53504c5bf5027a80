//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    database::Db,
    domain::{
        billing::MockBillingService,
        invitations::PgInvitationsService,
        lockers::PgLockerDirectory,
        rentals::{PgRentalsService, RentalCollaborators},
        usages::PgUsageLog,
        users::PgUserDirectory,
    },
};

use super::db::TestDb;

/// Base URL used for redemption links in tests.
pub(crate) const SHARE_BASE_URL: &str = "https://liff.example.com";

pub struct TestContext {
    pub db: TestDb,
    pub lockers: PgLockerDirectory,
    pub users: PgUserDirectory,
    pub usages: PgUsageLog,
    pub rentals: PgRentalsService,
    pub invitations: PgInvitationsService,
}

impl TestContext {
    /// Context whose billing collaborator accepts every charge.
    pub async fn new() -> Self {
        let mut billing = MockBillingService::new();

        billing
            .expect_charge_for_interval()
            .returning(|_, _, _| Ok(()));

        Self::with_billing(billing).await
    }

    /// Context wired to the given billing mock, so tests can assert on charges.
    pub async fn with_billing(billing: MockBillingService) -> Self {
        let test_db = TestDb::new().await;
        let pool = test_db.pool().clone();
        let db = Db::new(pool.clone());

        let lockers = PgLockerDirectory::new(pool.clone());
        let users = PgUserDirectory::new(pool.clone());
        let usages = PgUsageLog::new(pool);

        let rentals = PgRentalsService::new(
            db.clone(),
            RentalCollaborators {
                lockers: Arc::new(lockers.clone()),
                users: Arc::new(users.clone()),
                usages: Arc::new(usages.clone()),
                billing: Arc::new(billing),
            },
        );

        let invitations = PgInvitationsService::new(
            db,
            Arc::new(users.clone()),
            Arc::new(rentals.clone()),
            SHARE_BASE_URL,
        );

        Self {
            db: test_db,
            lockers,
            users,
            usages,
            rentals,
            invitations,
        }
    }
}
