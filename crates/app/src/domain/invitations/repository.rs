//! Invitations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    domain::invitations::{records::InvitationRecord, token::InvitationId},
    ids::{InstanceKey, LockerId, NationalId},
};

const CREATE_INVITATION_SQL: &str = include_str!("sql/create_invitation.sql");
const FIND_UNUSED_INVITATION_SQL: &str = include_str!("sql/find_unused_invitation.sql");
const CONSUME_INVITATION_SQL: &str = include_str!("sql/consume_invitation.sql");
const LIST_INSTANCE_INVITATIONS_SQL: &str = include_str!("sql/list_instance_invitations.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInvitationsRepository;

impl PgInvitationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_invitation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: &InvitationId,
        instance: InstanceKey,
    ) -> Result<InvitationRecord, sqlx::Error> {
        query_as::<Postgres, InvitationRecord>(CREATE_INVITATION_SQL)
            .bind(id.as_str())
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .fetch_one(&mut **tx)
            .await
    }

    /// Looks up an invitation that has not been redeemed yet.
    pub(crate) async fn find_unused_invitation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: &InvitationId,
    ) -> Result<Option<InvitationRecord>, sqlx::Error> {
        query_as::<Postgres, InvitationRecord>(FIND_UNUSED_INVITATION_SQL)
            .bind(id.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Flips `is_used` from false to true.
    ///
    /// Returns `None` when the id is unknown or the invitation was already
    /// consumed; concurrent callers serialize on the row lock, so at most one
    /// of them gets the record.
    pub(crate) async fn consume_invitation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: &InvitationId,
        redeemer: &NationalId,
    ) -> Result<Option<InvitationRecord>, sqlx::Error> {
        query_as::<Postgres, InvitationRecord>(CONSUME_INVITATION_SQL)
            .bind(id.as_str())
            .bind(redeemer.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_instance_invitations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instance: InstanceKey,
    ) -> Result<Vec<InvitationRecord>, sqlx::Error> {
        query_as::<Postgres, InvitationRecord>(LIST_INSTANCE_INVITATIONS_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InvitationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: InvitationId::new(row.try_get::<String, _>("id")?),
            instance: InstanceKey::new(
                LockerId::new(row.try_get("locker_id")?),
                row.try_get::<SqlxTimestamp, _>("start_time")?.to_jiff(),
            ),
            is_used: row.try_get("is_used")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("used_at")?
                .map(SqlxTimestamp::to_jiff),
            used_by: row
                .try_get::<Option<String>, _>("used_by")?
                .map(NationalId::new),
        })
    }
}
