use clap::{Parser, Subcommand};

use crate::config::LoggingConfig;

mod db;
mod lockers;
mod rentals;
mod shares;
mod users;

#[derive(Debug, Parser)]
#[command(name = "lockers-app", about = "Locker rentals CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Locker(lockers::LockerCommand),
    User(users::UserCommand),
    Rental(rentals::RentalCommand),
    Share(shares::ShareCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Locker(command) => lockers::run(command).await,
            Commands::User(command) => users::run(command).await,
            Commands::Rental(command) => rentals::run(command).await,
            Commands::Share(command) => shares::run(command).await,
        }
    }
}

/// Connect and wire the rental and sharing services.
async fn app_context(
    config: crate::config::ServiceConfig,
) -> Result<lockers_app::context::AppContext, String> {
    lockers_app::context::AppContext::from_database_url(
        &config.database.database_url,
        &config.share.share_base_url,
        config.billing.into(),
    )
    .await
    .map_err(|error| format!("{error}"))
}
