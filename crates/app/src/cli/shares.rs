use clap::{Args, Subcommand};
use lockers_app::{
    domain::invitations::{InvitationsServiceError, token::InvitationId},
    ids::{LockerId, NationalId},
};

use crate::config::ServiceConfig;

use super::{app_context, rentals::RevokeArgs};

#[derive(Debug, Args)]
pub(crate) struct ShareCommand {
    #[command(subcommand)]
    command: ShareSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShareSubcommand {
    /// Issue a single-use invitation link for an open rental
    Invite(InviteArgs),

    /// Redeem an invitation
    Redeem(RedeemArgs),

    /// Revoke a shared user's access
    Revoke(RevokeArgs),
}

#[derive(Debug, Args)]
struct InviteArgs {
    #[arg(long)]
    locker_id: i64,

    /// Owner of the open rental
    #[arg(long)]
    national_id: String,

    #[command(flatten)]
    config: ServiceConfig,
}

#[derive(Debug, Args)]
struct RedeemArgs {
    /// Invitation id, the `accessCode` of the share link
    #[arg(long)]
    invitation: String,

    /// User redeeming the invitation
    #[arg(long)]
    national_id: String,

    #[command(flatten)]
    config: ServiceConfig,
}

pub(crate) async fn run(command: ShareCommand) -> Result<(), String> {
    match command.command {
        ShareSubcommand::Invite(args) => invite(args).await,
        ShareSubcommand::Redeem(args) => redeem(args).await,
        ShareSubcommand::Revoke(args) => revoke(args).await,
    }
}

fn describe(action: &str, error: &InvitationsServiceError) -> String {
    format!("failed to {action} ({:?}): {error}", error.kind())
}

async fn invite(args: InviteArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let issued = ctx
        .invitations
        .issue_invitation(
            LockerId::new(args.locker_id),
            &NationalId::new(args.national_id),
        )
        .await
        .map_err(|error| describe("issue invitation", &error))?;

    println!("invitation: {}", issued.invitation.id);
    println!("url: {}", issued.url);

    Ok(())
}

async fn redeem(args: RedeemArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    let invitation = ctx
        .invitations
        .redeem_invitation(
            &NationalId::new(args.national_id),
            &InvitationId::new(args.invitation),
        )
        .await
        .map_err(|error| describe("redeem invitation", &error))?;

    println!("instance: {}", invitation.instance);
    println!("redeemed");

    Ok(())
}

async fn revoke(args: RevokeArgs) -> Result<(), String> {
    let ctx = app_context(args.config).await?;

    ctx.invitations
        .revoke_share(
            &NationalId::new(args.owner),
            &NationalId::new(args.national_id),
            LockerId::new(args.locker_id),
        )
        .await
        .map_err(|error| describe("revoke share", &error))?;

    println!("revoked");

    Ok(())
}
