//! Usages Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    domain::usages::records::UsageRecord,
    ids::{InstanceKey, LockerId, NationalId, UsageUuid},
};

const CREATE_USAGE_SQL: &str = include_str!("sql/create_usage.sql");
const LIST_USAGES_SQL: &str = include_str!("sql/list_usages.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgUsagesRepository {
    pool: PgPool,
}

impl PgUsagesRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts nothing unless `national_id` holds a grant on `instance` and the rental is still in use.
    pub(crate) async fn create_usage(
        &self,
        uuid: UsageUuid,
        instance: InstanceKey,
        national_id: &NationalId,
    ) -> Result<Option<UsageRecord>, sqlx::Error> {
        query_as::<Postgres, UsageRecord>(CREATE_USAGE_SQL)
            .bind(uuid.into_uuid())
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .bind(national_id.as_str())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn list_usages(
        &self,
        instance: InstanceKey,
    ) -> Result<Vec<UsageRecord>, sqlx::Error> {
        query_as::<Postgres, UsageRecord>(LIST_USAGES_SQL)
            .bind(instance.locker_id.as_i64())
            .bind(SqlxTimestamp::from(instance.start_time))
            .fetch_all(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UsageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UsageUuid::from_uuid(row.try_get("uuid")?),
            instance: InstanceKey::new(
                LockerId::new(row.try_get("locker_id")?),
                row.try_get::<SqlxTimestamp, _>("start_time")?.to_jiff(),
            ),
            national_id: NationalId::new(row.try_get::<String, _>("national_id")?),
            unlocked_at: row.try_get::<SqlxTimestamp, _>("unlocked_at")?.to_jiff(),
        })
    }
}
