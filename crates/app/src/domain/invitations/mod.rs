//! Invitations and sharing

pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod token;

pub use errors::InvitationsServiceError;
pub use service::*;
