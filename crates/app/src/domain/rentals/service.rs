//! Rentals Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        billing::BillingService,
        errors::Resource,
        invitations::repository::PgInvitationsRepository,
        lockers::LockerDirectory,
        rentals::{
            data::{InstanceFilter, InstanceRelations},
            errors::{NOT_ALLOWED_TO_ACCESS, RentalsServiceError},
            records::{AccessGrantRecord, LockerInstanceDetails, LockerInstanceRecord},
            repositories::{PgGrantsRepository, PgInstancesRepository},
        },
        usages::{UsageLog, records::UsageRecord},
        users::UserDirectory,
    },
    ids::{InstanceKey, LockerId, NationalId},
};

/// External systems the rental lifecycle consults.
#[derive(Clone)]
pub struct RentalCollaborators {
    pub lockers: Arc<dyn LockerDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub usages: Arc<dyn UsageLog>,
    pub billing: Arc<dyn BillingService>,
}

impl fmt::Debug for RentalCollaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentalCollaborators").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct PgRentalsService {
    db: Db,
    collaborators: RentalCollaborators,
    instances: PgInstancesRepository,
    grants: PgGrantsRepository,
    invitations: PgInvitationsRepository,
}

impl PgRentalsService {
    #[must_use]
    pub fn new(db: Db, collaborators: RentalCollaborators) -> Self {
        Self {
            db,
            collaborators,
            instances: PgInstancesRepository::new(),
            grants: PgGrantsRepository::new(),
            invitations: PgInvitationsRepository::new(),
        }
    }

    async fn resolve_active_locker(&self, access_code: &str) -> Result<LockerId, RentalsServiceError> {
        let locker = self
            .collaborators
            .lockers
            .resolve_by_access_code(access_code)
            .await?;

        if !self.collaborators.lockers.is_active(locker.id).await? {
            return Err(RentalsServiceError::NotFound(Resource::ActiveLocker));
        }

        Ok(locker.id)
    }
}

#[async_trait]
impl RentalsService for PgRentalsService {
    #[tracing::instrument(
        name = "rentals.service.open_rental",
        skip(self, access_code),
        fields(national_id = %requester, locker_id = tracing::field::Empty),
        err
    )]
    async fn open_rental(
        &self,
        access_code: &str,
        requester: &NationalId,
    ) -> Result<LockerInstanceRecord, RentalsServiceError> {
        let locker = self.resolve_active_locker(access_code).await?;

        tracing::Span::current().record("locker_id", tracing::field::display(locker));

        self.collaborators.users.resolve_user(requester).await?;

        let mut tx = self.db.begin_transaction().await?;

        if self
            .instances
            .find_active_instance(&mut tx, locker)
            .await?
            .is_some()
        {
            return Err(RentalsServiceError::Conflict);
        }

        // A concurrent open that passed the check above loses on the partial
        // unique index and surfaces as `Conflict`.
        let instance = self
            .instances
            .create_instance(&mut tx, locker, requester)
            .await?;

        self.grants
            .create_grant(&mut tx, instance.key(), requester)
            .await?;

        tx.commit().await?;

        info!(instance = %instance.key(), "opened rental");

        Ok(instance)
    }

    async fn get_active_instance(
        &self,
        locker: LockerId,
        relations: InstanceRelations,
    ) -> Result<LockerInstanceDetails, RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .find_active_instance(&mut tx, locker)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        let grants = if relations.grants {
            Some(
                self.grants
                    .list_instance_grants(&mut tx, instance.key())
                    .await?,
            )
        } else {
            None
        };

        let invitations = if relations.invitations {
            Some(
                self.invitations
                    .list_instance_invitations(&mut tx, instance.key())
                    .await?,
            )
        } else {
            None
        };

        tx.commit().await?;

        let usages = if relations.usages {
            Some(
                self.collaborators
                    .usages
                    .list_usages(instance.key())
                    .await?,
            )
        } else {
            None
        };

        Ok(LockerInstanceDetails {
            instance,
            grants,
            usages,
            invitations,
        })
    }

    async fn get_instance(&self, key: InstanceKey) -> Result<LockerInstanceRecord, RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .get_instance(&mut tx, key)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        tx.commit().await?;

        Ok(instance)
    }

    async fn list_instances(
        &self,
        filter: InstanceFilter,
    ) -> Result<Vec<LockerInstanceRecord>, RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let instances = match &filter {
            InstanceFilter::All => self.instances.list_instances(&mut tx).await?,
            InstanceFilter::Active => self.instances.list_active_instances(&mut tx).await?,
            InstanceFilter::ActiveOwnedBy(owner) => {
                self.instances
                    .list_active_instances_owned_by(&mut tx, owner)
                    .await?
            }
            InstanceFilter::SharedWith(user) => {
                self.instances
                    .list_instances_shared_with(&mut tx, user)
                    .await?
            }
        };

        tx.commit().await?;

        Ok(instances)
    }

    async fn list_grants(
        &self,
        user: &NationalId,
    ) -> Result<Vec<AccessGrantRecord>, RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let grants = self.grants.list_user_grants(&mut tx, user).await?;

        tx.commit().await?;

        Ok(grants)
    }

    #[tracing::instrument(
        name = "rentals.service.grant_access",
        skip(self),
        fields(locker_id = %locker, national_id = %user),
        err
    )]
    async fn grant_access(
        &self,
        locker: LockerId,
        user: &NationalId,
    ) -> Result<bool, RentalsServiceError> {
        // Directory lookups stay outside the transaction.
        self.collaborators.users.resolve_user(user).await?;

        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .lock_active_instance(&mut tx, locker)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        let created = self
            .grants
            .create_grant(&mut tx, instance.key(), user)
            .await?;

        tx.commit().await?;

        if created {
            info!(instance = %instance.key(), "granted access");
        }

        Ok(created)
    }

    #[tracing::instrument(
        name = "rentals.service.revoke_access",
        skip(self),
        fields(locker_id = %locker, owner = %owner, national_id = %target),
        err
    )]
    async fn revoke_access(
        &self,
        owner: &NationalId,
        target: &NationalId,
        locker: LockerId,
    ) -> Result<(), RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .lock_active_instance(&mut tx, locker)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        if !instance.is_owned_by(owner) {
            return Err(RentalsServiceError::Unauthorized("not owner of locker"));
        }

        let rows_affected = self
            .grants
            .delete_grant(&mut tx, instance.key(), target)
            .await?;

        if rows_affected == 0 {
            return Err(RentalsServiceError::NotFound(Resource::Grant));
        }

        tx.commit().await?;

        info!(instance = %instance.key(), "revoked access");

        Ok(())
    }

    #[tracing::instrument(
        name = "rentals.service.authorize_unlock",
        skip(self, access_code),
        fields(national_id = %requester, locker_id = tracing::field::Empty),
        err
    )]
    async fn authorize_unlock(
        &self,
        requester: &NationalId,
        access_code: &str,
    ) -> Result<UsageRecord, RentalsServiceError> {
        let locker = self.resolve_active_locker(access_code).await?;

        tracing::Span::current().record("locker_id", tracing::field::display(locker));

        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .find_active_instance(&mut tx, locker)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        // No owner bypass: the owner unlocks through the grant written at open time.
        let grant = self
            .grants
            .find_grant(&mut tx, instance.key(), requester)
            .await?;

        tx.commit().await?;

        if grant.is_none() {
            return Err(RentalsServiceError::Unauthorized(NOT_ALLOWED_TO_ACCESS));
        }

        let user = self.collaborators.users.resolve_user(requester).await?;

        // A revoke or close landing after the commit above is caught by the
        // usage log, which re-checks the grant in the insert itself.
        let usage = self
            .collaborators
            .usages
            .record_unlock(&instance, &user)
            .await?;

        Ok(usage)
    }

    #[tracing::instrument(
        name = "rentals.service.close_rental",
        skip(self, access_code),
        fields(national_id = %requester, locker_id = tracing::field::Empty),
        err
    )]
    async fn close_rental(
        &self,
        requester: &NationalId,
        access_code: &str,
    ) -> Result<LockerInstanceRecord, RentalsServiceError> {
        let locker = self
            .collaborators
            .lockers
            .resolve_by_access_code(access_code)
            .await?;

        tracing::Span::current().record("locker_id", tracing::field::display(locker.id));

        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .lock_active_instance(&mut tx, locker.id)
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        if !instance.is_owned_by(requester) {
            return Err(RentalsServiceError::Unauthorized(
                "not owner of in used locker instance",
            ));
        }

        let closed = self
            .instances
            .close_instance(&mut tx, instance.key())
            .await?
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        let end_time = closed
            .end_time
            .ok_or(RentalsServiceError::NotFound(Resource::Instance))?;

        tx.commit().await?;

        info!(instance = %closed.key(), end_time = %end_time, "closed rental");

        if let Err(source) = self
            .collaborators
            .billing
            .charge_for_interval(closed.start_time, end_time, requester)
            .await
        {
            warn!(instance = %closed.key(), error = %source, "billing failed for closed rental");

            return Err(RentalsServiceError::BillingFailed {
                instance: Box::new(closed),
                source,
            });
        }

        Ok(closed)
    }

    #[tracing::instrument(
        name = "rentals.service.delete_instance",
        skip(self),
        fields(instance = %key),
        err
    )]
    async fn delete_instance(&self, key: InstanceKey) -> Result<(), RentalsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.instances.delete_instance(&mut tx, key).await?;

        if rows_affected == 0 {
            return Err(RentalsServiceError::NotFound(Resource::Instance));
        }

        tx.commit().await?;

        info!("deleted rental");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait RentalsService: Send + Sync {
    /// Opens a rental on the locker behind `access_code`, owned by `requester`.
    async fn open_rental(
        &self,
        access_code: &str,
        requester: &NationalId,
    ) -> Result<LockerInstanceRecord, RentalsServiceError>;

    /// Retrieve the open rental of a locker, with the requested relations.
    async fn get_active_instance(
        &self,
        locker: LockerId,
        relations: InstanceRelations,
    ) -> Result<LockerInstanceDetails, RentalsServiceError>;

    /// Retrieve a rental, open or closed, by its composite key.
    async fn get_instance(&self, key: InstanceKey) -> Result<LockerInstanceRecord, RentalsServiceError>;

    /// Retrieves rentals matching the filter.
    async fn list_instances(
        &self,
        filter: InstanceFilter,
    ) -> Result<Vec<LockerInstanceRecord>, RentalsServiceError>;

    /// Grants the user holds on open rentals.
    async fn list_grants(
        &self,
        user: &NationalId,
    ) -> Result<Vec<AccessGrantRecord>, RentalsServiceError>;

    /// Lets `user` unlock the open rental of `locker`.
    ///
    /// Returns `false` when the user already held a grant.
    async fn grant_access(
        &self,
        locker: LockerId,
        user: &NationalId,
    ) -> Result<bool, RentalsServiceError>;

    /// Removes `target`'s grant on the open rental of `locker`; only the owner may.
    async fn revoke_access(
        &self,
        owner: &NationalId,
        target: &NationalId,
        locker: LockerId,
    ) -> Result<(), RentalsServiceError>;

    /// Checks the requester's grant and logs the unlock.
    async fn authorize_unlock(
        &self,
        requester: &NationalId,
        access_code: &str,
    ) -> Result<UsageRecord, RentalsServiceError>;

    /// Closes the requester's rental and submits the charge.
    async fn close_rental(
        &self,
        requester: &NationalId,
        access_code: &str,
    ) -> Result<LockerInstanceRecord, RentalsServiceError>;

    /// Hard-deletes a rental with its grants, invitations and usages.
    async fn delete_instance(&self, key: InstanceKey) -> Result<(), RentalsServiceError>;
}
