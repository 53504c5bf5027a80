//! Lockers service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::lockers::records::UnknownLockerStatus;

#[derive(Debug, Error)]
pub enum LockersServiceError {
    #[error("locker already exists")]
    AlreadyExists,

    #[error("locker not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid locker status")]
    InvalidStatus(#[from] UnknownLockerStatus),

    #[error("storage error: {0}")]
    Sql(#[source] Error),
}

impl From<Error> for LockersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
