//! Locker Rental Domain Concerns

pub mod billing;
pub mod errors;
pub mod invitations;
pub mod lockers;
pub mod rentals;
pub mod usages;
pub mod users;
