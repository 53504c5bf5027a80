//! Typed identifiers

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use uuid::Uuid;

/// Physical locker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockerId(i64);

impl LockerId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl Display for LockerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<i64> for LockerId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// National identity number; the user key across the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NationalId(String);

impl NationalId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NationalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for NationalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NationalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Composite identity of a rental session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub locker_id: LockerId,
    pub start_time: Timestamp,
}

impl InstanceKey {
    #[must_use]
    pub const fn new(locker_id: LockerId, start_time: Timestamp) -> Self {
        Self {
            locker_id,
            start_time,
        }
    }
}

impl Display for InstanceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}@{}", self.locker_id, self.start_time)
    }
}

/// Usage record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageUuid(Uuid);

impl UsageUuid {
    /// Generate a new time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for UsageUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UsageUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}
