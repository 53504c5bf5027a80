//! App Context

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        billing::{BillingConfig, BillingService, HttpBillingService},
        invitations::{InvitationsService, PgInvitationsService},
        lockers::{LockerDirectory, PgLockerDirectory},
        rentals::{PgRentalsService, RentalCollaborators, RentalsService},
        usages::{PgUsageLog, UsageLog},
        users::{PgUserDirectory, UserDirectory},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub lockers: Arc<dyn LockerDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub usages: Arc<dyn UsageLog>,
    pub rentals: Arc<dyn RentalsService>,
    pub invitations: Arc<dyn InvitationsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        share_base_url: &str,
        billing: BillingConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_pool(
            pool,
            share_base_url,
            Arc::new(HttpBillingService::new(billing)),
        ))
    }

    /// Wire every service over an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, share_base_url: &str, billing: Arc<dyn BillingService>) -> Self {
        let db = Db::new(pool.clone());

        let lockers: Arc<dyn LockerDirectory> = Arc::new(PgLockerDirectory::new(pool.clone()));
        let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));
        let usages: Arc<dyn UsageLog> = Arc::new(PgUsageLog::new(pool));

        let rentals: Arc<dyn RentalsService> = Arc::new(PgRentalsService::new(
            db.clone(),
            RentalCollaborators {
                lockers: Arc::clone(&lockers),
                users: Arc::clone(&users),
                usages: Arc::clone(&usages),
                billing,
            },
        ));

        let invitations: Arc<dyn InvitationsService> = Arc::new(PgInvitationsService::new(
            db,
            Arc::clone(&users),
            Arc::clone(&rentals),
            share_base_url,
        ));

        Self {
            lockers,
            users,
            usages,
            rentals,
            invitations,
        }
    }
}
