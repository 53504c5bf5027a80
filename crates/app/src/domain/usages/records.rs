//! Usage Records

use jiff::Timestamp;

use crate::ids::{InstanceKey, NationalId, UsageUuid};

/// One unlock of a rented locker.
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub uuid: UsageUuid,
    pub instance: InstanceKey,
    pub national_id: NationalId,
    pub unlocked_at: Timestamp,
}
