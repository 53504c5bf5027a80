//! Rentals service errors.
//!
//! Only `NotFound`, `Conflict`, `Unauthorized` and `BillingFailed` are part of
//! the client contract. Every other variant wraps an unexpected failure; it
//! renders as `not found: <cause>` and reports [`ErrorKind::NotFound`], so a
//! caller cannot tell a broken store from a missing record.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind as SqlErrorKind},
};
use thiserror::Error;

use crate::domain::{
    billing::BillingError,
    errors::{ErrorKind, Resource},
    lockers::LockersServiceError,
    rentals::records::LockerInstanceRecord,
    usages::UsagesServiceError,
    users::UsersServiceError,
};

pub(crate) const NOT_ALLOWED_TO_ACCESS: &str = "user is not allowed to access this locker";

#[derive(Debug, Error)]
pub enum RentalsServiceError {
    #[error("{0} not found")]
    NotFound(Resource),

    #[error("locker is in use")]
    Conflict,

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// The close is durable; only the charge is missing.
    #[error("rental closed but billing failed: {source}")]
    BillingFailed {
        instance: Box<LockerInstanceRecord>,
        #[source]
        source: BillingError,
    },

    #[error("not found: {0}")]
    Sql(#[source] Error),

    #[error("not found: {0}")]
    Lockers(#[source] LockersServiceError),

    #[error("not found: {0}")]
    Users(#[source] UsersServiceError),

    #[error("not found: {0}")]
    Usages(#[source] UsagesServiceError),
}

impl RentalsServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Conflict => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::BillingFailed { .. } => ErrorKind::BillingFailed,
            Self::NotFound(_) | Self::Sql(_) | Self::Lockers(_) | Self::Users(_) | Self::Usages(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

impl From<Error> for RentalsServiceError {
    fn from(error: Error) -> Self {
        // The only unique index a rental write can trip is the one-active-rental index.
        match error.as_database_error().map(DatabaseError::kind) {
            Some(SqlErrorKind::UniqueViolation) => Self::Conflict,
            _ => Self::Sql(error),
        }
    }
}

impl From<LockersServiceError> for RentalsServiceError {
    fn from(error: LockersServiceError) -> Self {
        match error {
            LockersServiceError::NotFound => Self::NotFound(Resource::Locker),
            error => Self::Lockers(error),
        }
    }
}

impl From<UsersServiceError> for RentalsServiceError {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::NotFound => Self::NotFound(Resource::User),
            error => Self::Users(error),
        }
    }
}

impl From<UsagesServiceError> for RentalsServiceError {
    fn from(error: UsagesServiceError) -> Self {
        match error {
            UsagesServiceError::InvalidReference => Self::NotFound(Resource::Instance),
            UsagesServiceError::NoActiveGrant => Self::Unauthorized(NOT_ALLOWED_TO_ACCESS),
            error => Self::Usages(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_failures_report_not_found_with_cause() {
        let error = RentalsServiceError::from(Error::PoolTimedOut);

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(
            error.to_string().starts_with("not found: "),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn storage_causes_survive_into_the_message() {
        let lockers = RentalsServiceError::from(LockersServiceError::Sql(Error::PoolTimedOut));
        let users = RentalsServiceError::from(UsersServiceError::Sql(Error::PoolClosed));
        let usages = RentalsServiceError::from(UsagesServiceError::Sql(Error::PoolTimedOut));

        assert!(lockers.to_string().contains("timed out"), "got {lockers}");
        assert!(users.to_string().contains("closed"), "got {users}");
        assert!(usages.to_string().contains("timed out"), "got {usages}");
    }

    #[test]
    fn unlock_without_live_grant_is_unauthorized() {
        let error = RentalsServiceError::from(UsagesServiceError::NoActiveGrant);

        assert!(matches!(
            error,
            RentalsServiceError::Unauthorized(NOT_ALLOWED_TO_ACCESS)
        ));
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn directory_not_found_names_the_resource() {
        let locker = RentalsServiceError::from(LockersServiceError::NotFound);
        let user = RentalsServiceError::from(UsersServiceError::NotFound);

        assert!(matches!(locker, RentalsServiceError::NotFound(Resource::Locker)));
        assert!(matches!(user, RentalsServiceError::NotFound(Resource::User)));
        assert_eq!(locker.to_string(), "locker not found");
    }

    #[test]
    fn domain_errors_keep_their_kind() {
        assert_eq!(RentalsServiceError::Conflict.kind(), ErrorKind::Conflict);
        assert_eq!(
            RentalsServiceError::Unauthorized("not owner").kind(),
            ErrorKind::Unauthorized
        );
    }
}
