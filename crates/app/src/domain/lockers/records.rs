//! Locker Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::ids::LockerId;

/// Deployment status of a locker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockerStatus {
    /// Deployed and rentable.
    Active,

    /// Withdrawn from service.
    Inactive,
}

impl LockerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl Display for LockerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown locker status `{0}`")]
pub struct UnknownLockerStatus(pub String);

impl FromStr for LockerStatus {
    type Err = UnknownLockerStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownLockerStatus(other.to_string())),
        }
    }
}

/// Locker Record
#[derive(Debug, Clone)]
pub struct LockerRecord {
    pub id: LockerId,
    pub access_code: String,
    pub status: LockerStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LockerRecord {
    /// Whether the locker can currently be rented and unlocked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == LockerStatus::Active
    }
}
