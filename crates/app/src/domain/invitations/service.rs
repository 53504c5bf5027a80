//! Invitations Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        errors::Resource,
        invitations::{
            errors::InvitationsServiceError,
            records::{InvitationRecord, IssuedInvitation},
            repository::PgInvitationsRepository,
            token::{InvitationId, share_url},
        },
        rentals::{
            RentalsService,
            repositories::{PgGrantsRepository, PgInstancesRepository},
        },
        users::UserDirectory,
    },
    ids::{LockerId, NationalId},
};

#[derive(Clone)]
pub struct PgInvitationsService {
    db: Db,
    users: Arc<dyn UserDirectory>,
    rentals: Arc<dyn RentalsService>,
    share_base_url: String,
    instances: PgInstancesRepository,
    grants: PgGrantsRepository,
    invitations: PgInvitationsRepository,
}

impl fmt::Debug for PgInvitationsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgInvitationsService")
            .field("db", &self.db)
            .field("share_base_url", &self.share_base_url)
            .finish_non_exhaustive()
    }
}

impl PgInvitationsService {
    #[must_use]
    pub fn new(
        db: Db,
        users: Arc<dyn UserDirectory>,
        rentals: Arc<dyn RentalsService>,
        share_base_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            users,
            rentals,
            share_base_url: share_base_url.into(),
            instances: PgInstancesRepository::new(),
            grants: PgGrantsRepository::new(),
            invitations: PgInvitationsRepository::new(),
        }
    }
}

#[async_trait]
impl InvitationsService for PgInvitationsService {
    #[tracing::instrument(
        name = "invitations.service.issue_invitation",
        skip(self),
        fields(locker_id = %locker, national_id = %requester),
        err
    )]
    async fn issue_invitation(
        &self,
        locker: LockerId,
        requester: &NationalId,
    ) -> Result<IssuedInvitation, InvitationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let instance = self
            .instances
            .find_active_instance(&mut tx, locker)
            .await?
            .ok_or(InvitationsServiceError::NotFound(Resource::Instance))?;

        if !instance.is_owned_by(requester) {
            return Err(InvitationsServiceError::Unauthorized(
                "only the owner can share a locker",
            ));
        }

        let invitation = self
            .invitations
            .create_invitation(&mut tx, &InvitationId::generate(), instance.key())
            .await?;

        tx.commit().await?;

        info!(instance = %instance.key(), "issued invitation");

        Ok(IssuedInvitation {
            url: share_url(&self.share_base_url, &invitation.id),
            invitation,
        })
    }

    async fn find_invitation(
        &self,
        id: &InvitationId,
    ) -> Result<InvitationRecord, InvitationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let invitation = self
            .invitations
            .find_unused_invitation(&mut tx, id)
            .await?
            .ok_or(InvitationsServiceError::NotFound(Resource::Invitation))?;

        tx.commit().await?;

        Ok(invitation)
    }

    #[tracing::instrument(
        name = "invitations.service.redeem_invitation",
        skip(self, id),
        fields(national_id = %redeemer),
        err
    )]
    async fn redeem_invitation(
        &self,
        redeemer: &NationalId,
        id: &InvitationId,
    ) -> Result<InvitationRecord, InvitationsServiceError> {
        self.users.resolve_user(redeemer).await?;

        let mut tx = self.db.begin_transaction().await?;

        let invitation = self
            .invitations
            .consume_invitation(&mut tx, id, redeemer)
            .await?
            .ok_or(InvitationsServiceError::NotFound(Resource::Invitation))?;

        // Dropping `tx` on any early return below leaves the invitation unconsumed.
        let instance = self
            .instances
            .lock_instance(&mut tx, invitation.instance)
            .await?
            .filter(|instance| instance.in_used)
            .ok_or(InvitationsServiceError::NotFound(Resource::Instance))?;

        self.grants
            .create_grant(&mut tx, instance.key(), redeemer)
            .await?;

        tx.commit().await?;

        info!(instance = %instance.key(), "redeemed invitation");

        Ok(invitation)
    }

    async fn revoke_share(
        &self,
        owner: &NationalId,
        target: &NationalId,
        locker: LockerId,
    ) -> Result<(), InvitationsServiceError> {
        Ok(self.rentals.revoke_access(owner, target, locker).await?)
    }
}

#[automock]
#[async_trait]
pub trait InvitationsService: Send + Sync {
    /// Issues a single-use invitation to the owner's open rental of `locker`.
    async fn issue_invitation(
        &self,
        locker: LockerId,
        requester: &NationalId,
    ) -> Result<IssuedInvitation, InvitationsServiceError>;

    /// Looks up an invitation that can still be redeemed.
    async fn find_invitation(
        &self,
        id: &InvitationId,
    ) -> Result<InvitationRecord, InvitationsServiceError>;

    /// Consumes the invitation and grants the redeemer access to its rental.
    ///
    /// Unknown and already-redeemed invitations both yield
    /// `NotFound(Invitation)`. An invitation whose rental has since closed
    /// yields `NotFound(Instance)` and stays unconsumed.
    async fn redeem_invitation(
        &self,
        redeemer: &NationalId,
        id: &InvitationId,
    ) -> Result<InvitationRecord, InvitationsServiceError>;

    /// Revokes a user's access to a shared rental.
    async fn revoke_share(
        &self,
        owner: &NationalId,
        target: &NationalId,
        locker: LockerId,
    ) -> Result<(), InvitationsServiceError>;
}
