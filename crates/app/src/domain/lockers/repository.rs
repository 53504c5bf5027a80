//! Lockers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    domain::lockers::{
        data::NewLocker,
        records::{LockerRecord, LockerStatus},
    },
    ids::LockerId,
};

const FIND_LOCKER_BY_ACCESS_CODE_SQL: &str = include_str!("sql/find_locker_by_access_code.sql");
const GET_LOCKER_SQL: &str = include_str!("sql/get_locker.sql");
const CREATE_LOCKER_SQL: &str = include_str!("sql/create_locker.sql");
const UPDATE_LOCKER_STATUS_SQL: &str = include_str!("sql/update_locker_status.sql");

#[derive(Debug, Clone)]
/// PostgreSQL-backed locker directory.
pub(crate) struct PgLockersRepository {
    pool: PgPool,
}

impl PgLockersRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_by_access_code(
        &self,
        access_code: &str,
    ) -> Result<Option<LockerRecord>, sqlx::Error> {
        query_as::<Postgres, LockerRecord>(FIND_LOCKER_BY_ACCESS_CODE_SQL)
            .bind(access_code)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn get_locker(
        &self,
        locker: LockerId,
    ) -> Result<Option<LockerRecord>, sqlx::Error> {
        query_as::<Postgres, LockerRecord>(GET_LOCKER_SQL)
            .bind(locker.as_i64())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn create_locker(&self, locker: NewLocker) -> Result<LockerRecord, sqlx::Error> {
        query_as::<Postgres, LockerRecord>(CREATE_LOCKER_SQL)
            .bind(locker.id.as_i64())
            .bind(locker.access_code)
            .bind(locker.status.as_str())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        locker: LockerId,
        status: LockerStatus,
    ) -> Result<Option<LockerRecord>, sqlx::Error> {
        query_as::<Postgres, LockerRecord>(UPDATE_LOCKER_STATUS_SQL)
            .bind(locker.as_i64())
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LockerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<LockerStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: LockerId::new(row.try_get("id")?),
            access_code: row.try_get("access_code")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
