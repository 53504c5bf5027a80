//! Billing client.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use zeroize::Zeroizing;

use crate::{domain::billing::errors::BillingError, ids::NationalId};

/// Configuration for the external billing service.
#[derive(Clone)]
pub struct BillingConfig {
    /// Base URL, e.g. `"http://billing.internal"`.
    pub url: String,

    /// Bearer token presented on every request.
    pub token: Zeroizing<String>,
}

impl fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingConfig")
            .field("url", &self.url)
            .field("token", &"**redacted**")
            .finish()
    }
}

/// HTTP client that submits rental charges to the billing service.
#[derive(Debug, Clone)]
pub struct HttpBillingService {
    config: BillingConfig,
    http: Client,
}

impl HttpBillingService {
    #[must_use]
    pub fn new(config: BillingConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest<'a> {
    national_id: &'a str,
    start_time: Timestamp,
    end_time: Timestamp,
    duration_seconds: i64,
}

impl<'a> ChargeRequest<'a> {
    fn new(start: Timestamp, end: Timestamp, user: &'a NationalId) -> Self {
        Self {
            national_id: user.as_str(),
            start_time: start,
            end_time: end,
            duration_seconds: end.duration_since(start).as_secs(),
        }
    }
}

#[async_trait]
impl BillingService for HttpBillingService {
    #[tracing::instrument(
        name = "billing.service.charge_for_interval",
        skip(self),
        fields(national_id = %user),
        err
    )]
    async fn charge_for_interval(
        &self,
        start: Timestamp,
        end: Timestamp,
        user: &NationalId,
    ) -> Result<(), BillingError> {
        let url = format!("{}/charges", self.config.url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.token.as_str())
            .json(&ChargeRequest::new(start, end, user))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(BillingError::UnexpectedResponse(format!(
                "charge request failed with status {status}: {text}"
            )));
        }

        info!("submitted rental charge");

        Ok(())
    }
}

#[automock]
#[async_trait]
/// Computes and records the charge for a rental interval.
pub trait BillingService: Send + Sync {
    /// Charge `user` for the time between `start` and `end`.
    async fn charge_for_interval(
        &self,
        start: Timestamp,
        end: Timestamp,
        user: &NationalId,
    ) -> Result<(), BillingError>;
}
