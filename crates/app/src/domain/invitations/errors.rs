//! Invitations service errors.
//!
//! Follows the same fail-closed contract as the rentals service: unexpected
//! failures render as `not found: <cause>` and report [`ErrorKind::NotFound`].

use sqlx::Error;
use thiserror::Error;

use crate::domain::{
    errors::{ErrorKind, Resource},
    rentals::RentalsServiceError,
    users::UsersServiceError,
};

#[derive(Debug, Error)]
pub enum InvitationsServiceError {
    /// Unknown and already-redeemed invitations are indistinguishable.
    #[error("{0} not found")]
    NotFound(Resource),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Rentals(#[from] RentalsServiceError),

    #[error("not found: {0}")]
    Sql(#[source] Error),

    #[error("not found: {0}")]
    Users(#[source] UsersServiceError),
}

impl InvitationsServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Rentals(error) => error.kind(),
            Self::NotFound(_) | Self::Sql(_) | Self::Users(_) => ErrorKind::NotFound,
        }
    }
}

impl From<Error> for InvitationsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<UsersServiceError> for InvitationsServiceError {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::NotFound => Self::NotFound(Resource::User),
            error => Self::Users(error),
        }
    }
}
