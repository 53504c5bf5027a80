//! Access Grants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::rentals::records::AccessGrantRecord,
    ids::{InstanceKey, LockerId, NationalId},
};

const CREATE_GRANT_SQL: &str = include_str!("../sql/create_grant.sql");
const FIND_GRANT_SQL: &str = include_str!("../sql/find_grant.sql");
const LIST_INSTANCE_GRANTS_SQL: &str = include_str!("../sql/list_instance_grants.sql");
const LIST_USER_GRANTS_SQL: &str = include_str!("../sql/list_user_grants.sql");
const DELETE_GRANT_SQL: &str = include_str!("../sql/delete_grant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGrantsRepository;

impl PgGrantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts a grant; returns `false` when the user already held one.
    pub(crate) async fn create_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instance: InstanceKey,
        user: &NationalId,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_GRANT_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .bind(user.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(crate) async fn find_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instance: InstanceKey,
        user: &NationalId,
    ) -> Result<Option<AccessGrantRecord>, sqlx::Error> {
        query_as::<Postgres, AccessGrantRecord>(FIND_GRANT_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .bind(user.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_instance_grants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instance: InstanceKey,
    ) -> Result<Vec<AccessGrantRecord>, sqlx::Error> {
        query_as::<Postgres, AccessGrantRecord>(LIST_INSTANCE_GRANTS_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_grants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NationalId,
    ) -> Result<Vec<AccessGrantRecord>, sqlx::Error> {
        query_as::<Postgres, AccessGrantRecord>(LIST_USER_GRANTS_SQL)
            .bind(user.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        instance: InstanceKey,
        user: &NationalId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_GRANT_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .bind(user.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AccessGrantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            instance: InstanceKey::new(
                LockerId::new(row.try_get("locker_id")?),
                row.try_get::<SqlxTimestamp, _>("start_time")?.to_jiff(),
            ),
            national_id: NationalId::new(row.try_get::<String, _>("national_id")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
