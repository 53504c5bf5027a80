use clap::{Args, Subcommand};
use jiff::Timestamp;
use lockers_app::{
    domain::rentals::{
        RentalsServiceError,
        data::{InstanceFilter, InstanceRelations},
        records::LockerInstanceRecord,
    },
    ids::{InstanceKey, LockerId, NationalId},
};

use crate::config::ServiceConfig;

use super::app_context;

#[derive(Debug, Args)]
pub(crate) struct RentalCommand {
    #[command(subcommand)]
    command: RentalSubcommand,
}

#[derive(Debug, Subcommand)]
enum RentalSubcommand {
    /// Open a rental on the locker behind an access code
    Open(ActorArgs),

    /// Unlock a rented locker
    Unlock(ActorArgs),

    /// Close a rental and submit its charge
    Close(ActorArgs),

    /// List rentals
    List(ListArgs),

    /// Show the open rental of a locker
    Show(ShowArgs),

    /// Let a user unlock the open rental of a locker
    Grant(GrantArgs),

    /// Remove a user's access to the open rental of a locker
    Revoke(RevokeArgs),

    /// Hard-delete a rental by locker and start time
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct ActorArgs {
    /// Code encoded in the locker's QR label
    #[arg(long)]
    access_code: String,

    /// National id of the acting user
    #[arg(long)]
    national_id: String,

    #[command(flatten)]
    config: ServiceConfig,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Include closed rentals
    #[arg(long, conflicts_with_all = ["owner", "shared_with"])]
    all: bool,

    /// Only open rentals owned by this user
    #[arg(long, conflicts_with = "shared_with")]
    owner: Option<String>,

    /// Only open rentals shared with this user
    #[arg(long)]
    shared_with: Option<String>,

    #[command(flatten)]
    config: ServiceConfig,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[arg(long)]
    locker_id: i64,

    #[command(flatten)]
    config: ServiceConfig,
}

#[derive(Debug, Args)]
struct GrantArgs {
    #[arg(long)]
    locker_id: i64,

    /// User receiving access
    #[arg(long)]
    national_id: String,

    #[command(flatten)]
    config: ServiceConfig,
}

#[derive(Debug, Args)]
pub(super) struct RevokeArgs {
    #[arg(long)]
    pub(super) locker_id: i64,

    /// Owner of the open rental
    #[arg(long)]
    pub(super) owner: String,

    /// User losing access
    #[arg(long)]
    pub(super) national_id: String,

    #[command(flatten)]
    pub(super) config: ServiceConfig,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[arg(long)]
    locker_id: i64,

    /// Start time of the rental, e.g. `2026-03-01T10:00:00Z`
    #[arg(long)]
    start_time: Timestamp,

    #[command(flatten)]
    config: ServiceConfig,
}

pub(crate) async fn run(command: RentalCommand) -> Result<(), String> {
    match command.command {
        RentalSubcommand::Open(args) => open(args).await,
        RentalSubcommand::Unlock(args) => unlock(args).await,
        RentalSubcommand::Close(args) => close(args).await,
        RentalSubcommand::List(args) => list(args).await,
        RentalSubcommand::Show(args) => show(args).await,
        RentalSubcommand::Grant(args) => grant(args).await,
        RentalSubcommand::Revoke(args) => revoke(args).await,
        RentalSubcommand::Delete(args) => delete(args).await,
    }
}

fn describe(action: &str, error: &RentalsServiceError) -> String {
    format!("failed to {action} ({:?}): {error}", error.kind())
}

async fn open(args: ActorArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let instance = ctx
        .rentals
        .open_rental(&args.access_code, &NationalId::new(args.national_id))
        .await
        .map_err(|error| describe("open rental", &error))?;

    print_instance(&instance);

    Ok(())
}

async fn unlock(args: ActorArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let usage = ctx
        .rentals
        .authorize_unlock(&NationalId::new(args.national_id), &args.access_code)
        .await
        .map_err(|error| describe("unlock locker", &error))?;

    println!("usage_uuid: {}", usage.uuid);
    println!("instance: {}", usage.instance);
    println!("unlocked_at: {}", usage.unlocked_at);

    Ok(())
}

async fn close(args: ActorArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    match ctx
        .rentals
        .close_rental(&NationalId::new(args.national_id), &args.access_code)
        .await
    {
        Ok(instance) => {
            print_instance(&instance);

            Ok(())
        }
        Err(RentalsServiceError::BillingFailed { instance, source }) => {
            print_instance(&instance);

            Err(format!("rental closed but billing failed: {source}"))
        }
        Err(error) => Err(describe("close rental", &error)),
    }
}

async fn list(args: ListArgs) -> Result<(), String> {
    let filter = match (args.all, args.owner, args.shared_with) {
        (true, _, _) => InstanceFilter::All,
        (false, Some(owner), _) => InstanceFilter::ActiveOwnedBy(NationalId::new(owner)),
        (false, None, Some(user)) => InstanceFilter::SharedWith(NationalId::new(user)),
        (false, None, None) => InstanceFilter::Active,
    };

    let ctx = app_context(args.config).await?;

    let instances = ctx
        .rentals
        .list_instances(filter)
        .await
        .map_err(|error| describe("list rentals", &error))?;

    for instance in &instances {
        let end = instance
            .end_time
            .map_or_else(|| "-".to_string(), |end| end.to_string());

        println!("{}\t{}\t{}\t{end}", instance.key(), instance.owner, instance.in_used);
    }

    Ok(())
}

async fn show(args: ShowArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let details = ctx
        .rentals
        .get_active_instance(LockerId::new(args.locker_id), InstanceRelations::ALL)
        .await
        .map_err(|error| describe("load rental", &error))?;

    print_instance(&details.instance);

    for grant in details.grants.unwrap_or_default() {
        println!("grant: {}", grant.national_id);
    }

    for usage in details.usages.unwrap_or_default() {
        println!("usage: {} {}", usage.national_id, usage.unlocked_at);
    }

    for invitation in details.invitations.unwrap_or_default() {
        println!("invitation: {} used={}", invitation.id, invitation.is_used);
    }

    Ok(())
}

async fn grant(args: GrantArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let created = ctx
        .rentals
        .grant_access(
            LockerId::new(args.locker_id),
            &NationalId::new(args.national_id),
        )
        .await
        .map_err(|error| describe("grant access", &error))?;

    println!("{}", if created { "granted" } else { "already granted" });

    Ok(())
}

async fn revoke(args: RevokeArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    ctx.rentals
        .revoke_access(
            &NationalId::new(args.owner),
            &NationalId::new(args.national_id),
            LockerId::new(args.locker_id),
        )
        .await
        .map_err(|error| describe("revoke access", &error))?;

    println!("revoked");

    Ok(())
}

async fn delete(args: DeleteArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    ctx.rentals
        .delete_instance(InstanceKey::new(
            LockerId::new(args.locker_id),
            args.start_time,
        ))
        .await
        .map_err(|error| describe("delete rental", &error))?;

    println!("deleted");

    Ok(())
}

fn print_instance(instance: &LockerInstanceRecord) {
    println!("locker_id: {}", instance.locker_id);
    println!("start_time: {}", instance.start_time);

    if let Some(end_time) = instance.end_time {
        println!("end_time: {end_time}");
    }

    println!("in_used: {}", instance.in_used);
    println!("owner: {}", instance.owner);
}
