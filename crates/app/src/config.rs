//! CLI configuration groups

use std::fmt;

use clap::Args;
use lockers_app::domain::billing;
use zeroize::Zeroizing;

/// Database settings.
#[derive(Args)]
pub(crate) struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub(crate) database_url: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("database_url", &"**redacted**")
            .finish()
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
}

/// Invitation link settings.
#[derive(Debug, Args)]
pub(crate) struct ShareConfig {
    /// Base URL of the page that redeems invitations
    #[arg(long, env = "SHARE_BASE_URL", default_value = "http://localhost:3000")]
    pub(crate) share_base_url: String,
}

/// Billing service settings.
#[derive(Args)]
pub(crate) struct BillingConfig {
    /// Base URL of the billing service
    #[arg(long, env = "BILLING_URL", default_value = "http://localhost:8081")]
    pub(crate) billing_url: String,

    /// Bearer token for the billing service
    #[arg(long, env = "BILLING_TOKEN", hide_env_values = true)]
    pub(crate) billing_token: String,
}

impl fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingConfig")
            .field("billing_url", &self.billing_url)
            .field("billing_token", &"**redacted**")
            .finish()
    }
}

impl From<BillingConfig> for billing::BillingConfig {
    fn from(config: BillingConfig) -> Self {
        Self {
            url: config.billing_url,
            token: Zeroizing::new(config.billing_token),
        }
    }
}

/// Everything needed to build the rental and sharing services.
#[derive(Debug, Args)]
pub(crate) struct ServiceConfig {
    #[command(flatten)]
    pub(crate) database: DatabaseConfig,

    #[command(flatten)]
    pub(crate) share: ShareConfig,

    #[command(flatten)]
    pub(crate) billing: BillingConfig,
}
