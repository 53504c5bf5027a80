use clap::{Args, Subcommand};
use lockers_app::{
    database,
    domain::lockers::{
        LockerDirectory, PgLockerDirectory,
        data::NewLocker,
        records::{LockerRecord, LockerStatus},
    },
    ids::LockerId,
};

use crate::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct LockerCommand {
    #[command(subcommand)]
    command: LockerSubcommand,
}

#[derive(Debug, Subcommand)]
enum LockerSubcommand {
    /// Register a physical locker
    Register(RegisterLockerArgs),

    /// Change a locker's deployment status
    Status(LockerStatusArgs),
}

#[derive(Debug, Args)]
struct RegisterLockerArgs {
    /// Locker number printed on the cabinet
    #[arg(long)]
    locker_id: i64,

    /// Code encoded in the locker's QR label
    #[arg(long)]
    access_code: String,

    /// Initial status (active, inactive)
    #[arg(long, default_value = "active")]
    status: LockerStatus,

    #[command(flatten)]
    database: DatabaseConfig,
}

#[derive(Debug, Args)]
struct LockerStatusArgs {
    #[arg(long)]
    locker_id: i64,

    /// New status (active, inactive)
    status: LockerStatus,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(command: LockerCommand) -> Result<(), String> {
    match command.command {
        LockerSubcommand::Register(args) => register(args).await,
        LockerSubcommand::Status(args) => set_status(args).await,
    }
}

async fn directory(database: &DatabaseConfig) -> Result<PgLockerDirectory, String> {
    let pool = database::connect(&database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgLockerDirectory::new(pool))
}

async fn register(args: RegisterLockerArgs) -> Result<(), String> {
    let locker = directory(&args.database)
        .await?
        .register_locker(NewLocker {
            id: LockerId::new(args.locker_id),
            access_code: args.access_code,
            status: args.status,
        })
        .await
        .map_err(|error| format!("failed to register locker: {error}"))?;

    print_locker(&locker);

    Ok(())
}

async fn set_status(args: LockerStatusArgs) -> Result<(), String> {
    let locker = directory(&args.database)
        .await?
        .set_status(LockerId::new(args.locker_id), args.status)
        .await
        .map_err(|error| format!("failed to update locker: {error}"))?;

    print_locker(&locker);

    Ok(())
}

fn print_locker(locker: &LockerRecord) {
    println!("locker_id: {}", locker.id);
    println!("access_code: {}", locker.access_code);
    println!("status: {}", locker.status);
}
