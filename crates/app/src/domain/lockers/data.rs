//! Locker Data

use crate::{domain::lockers::records::LockerStatus, ids::LockerId};

/// New Locker Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocker {
    /// Identifier printed on the cabinet.
    pub id: LockerId,

    /// Code encoded in the locker's QR label.
    pub access_code: String,

    /// Initial deployment status.
    pub status: LockerStatus,
}
