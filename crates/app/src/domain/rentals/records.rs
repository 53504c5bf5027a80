//! Rental Records

use jiff::Timestamp;

use crate::{
    domain::{invitations::records::InvitationRecord, usages::records::UsageRecord},
    ids::{InstanceKey, LockerId, NationalId},
};

/// One rental session of a locker.
///
/// `end_time` is set exactly when `in_used` is false; the schema enforces
/// this with a check constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerInstanceRecord {
    pub locker_id: LockerId,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub in_used: bool,
    pub owner: NationalId,
}

impl LockerInstanceRecord {
    #[must_use]
    pub const fn key(&self) -> InstanceKey {
        InstanceKey::new(self.locker_id, self.start_time)
    }

    #[must_use]
    pub fn is_owned_by(&self, national_id: &NationalId) -> bool {
        self.owner == *national_id
    }
}

/// Unlock right of one user on one rental session.
///
/// Grants on a closed session are inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrantRecord {
    pub instance: InstanceKey,
    pub national_id: NationalId,
    pub created_at: Timestamp,
}

/// An active rental with the relations the caller asked for.
///
/// A relation that was not requested is `None`.
#[derive(Debug, Clone)]
pub struct LockerInstanceDetails {
    pub instance: LockerInstanceRecord,
    pub grants: Option<Vec<AccessGrantRecord>>,
    pub usages: Option<Vec<UsageRecord>>,
    pub invitations: Option<Vec<InvitationRecord>>,
}
