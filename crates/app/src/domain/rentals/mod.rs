//! Locker rentals and their access-control lists

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::RentalsServiceError;
pub use service::*;
