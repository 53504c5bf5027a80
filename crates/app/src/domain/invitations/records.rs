//! Invitation Records

use jiff::Timestamp;

use crate::{
    domain::invitations::token::InvitationId,
    ids::{InstanceKey, NationalId},
};

/// Single-use invitation to one rental session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRecord {
    pub id: InvitationId,

    /// The exact session the invitation was issued against.
    pub instance: InstanceKey,

    pub is_used: bool,
    pub created_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub used_by: Option<NationalId>,
}

/// Invitation issuance result with its redemption link.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    pub invitation: InvitationRecord,
    pub url: String,
}
