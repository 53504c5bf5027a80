//! Billing hand-off for closed rentals

pub mod errors;
pub mod service;

pub use errors::BillingError;
pub use service::*;
