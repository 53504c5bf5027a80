//! Usage log errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsagesServiceError {
    #[error("related resource not found")]
    InvalidReference,

    #[error("no live grant for this unlock")]
    NoActiveGrant,

    #[error("storage error: {0}")]
    Sql(#[source] Error),
}

impl From<Error> for UsagesServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            _ => Self::Sql(error),
        }
    }
}
