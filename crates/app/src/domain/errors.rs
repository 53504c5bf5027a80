//! Error vocabulary shared by the rental and sharing services.
//!
//! Callers outside the crate should branch on [`ErrorKind`], never on the
//! concrete variant. Failures that are not part of the domain taxonomy
//! (storage errors, collaborator outages, malformed rows) report
//! [`ErrorKind::NotFound`]: the services fail closed and only the attached
//! message, not the kind, reveals what actually went wrong.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Client-facing classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record is absent, or an unexpected failure occurred.
    NotFound,

    /// The locker already has an active rental.
    Conflict,

    /// The actor is not the owner, or holds no grant.
    Unauthorized,

    /// The rental was closed but the charge could not be submitted.
    BillingFailed,
}

/// Record type named in a not-found error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Locker,
    ActiveLocker,
    Instance,
    User,
    Invitation,
    Grant,
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Locker => "locker",
            Self::ActiveLocker => "active locker",
            Self::Instance => "locker instance",
            Self::User => "user",
            Self::Invitation => "invitation",
            Self::Grant => "access grant",
        })
    }
}
