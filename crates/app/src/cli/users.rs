use clap::{Args, Subcommand};
use lockers_app::{
    database,
    domain::users::{PgUserDirectory, UserDirectory, data::NewUser},
    ids::NationalId,
};

use crate::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Register a user by national identity number
    Register(RegisterUserArgs),
}

#[derive(Debug, Args)]
struct RegisterUserArgs {
    #[arg(long)]
    national_id: String,

    #[arg(long)]
    display_name: String,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Register(args) => register(args).await,
    }
}

async fn register(args: RegisterUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUserDirectory::new(pool)
        .register_user(NewUser {
            national_id: NationalId::new(args.national_id),
            display_name: args.display_name,
        })
        .await
        .map_err(|error| format!("failed to register user: {error}"))?;

    println!("national_id: {}", user.national_id);
    println!("display_name: {}", user.display_name);

    Ok(())
}
