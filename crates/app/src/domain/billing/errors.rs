//! Billing errors.

use thiserror::Error;

/// Errors that can occur when submitting a charge.
#[derive(Debug, Error)]
pub enum BillingError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The billing service returned a non-2xx response.
    #[error("unexpected response from billing service: {0}")]
    UnexpectedResponse(String),
}
