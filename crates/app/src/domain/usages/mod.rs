//! Locker usage log

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::UsagesServiceError;
pub use service::*;
