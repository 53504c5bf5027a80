//! Locker Instances Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::rentals::records::LockerInstanceRecord,
    ids::{InstanceKey, LockerId, NationalId},
};

const FIND_ACTIVE_INSTANCE_SQL: &str = include_str!("../sql/find_active_instance.sql");
const LOCK_ACTIVE_INSTANCE_SQL: &str = include_str!("../sql/lock_active_instance.sql");
const GET_INSTANCE_SQL: &str = include_str!("../sql/get_instance.sql");
const LOCK_INSTANCE_SQL: &str = include_str!("../sql/lock_instance.sql");
const CREATE_INSTANCE_SQL: &str = include_str!("../sql/create_instance.sql");
const CLOSE_INSTANCE_SQL: &str = include_str!("../sql/close_instance.sql");
const DELETE_INSTANCE_SQL: &str = include_str!("../sql/delete_instance.sql");
const LIST_INSTANCES_SQL: &str = include_str!("../sql/list_instances.sql");
const LIST_ACTIVE_INSTANCES_SQL: &str = include_str!("../sql/list_active_instances.sql");
const LIST_ACTIVE_INSTANCES_OWNED_BY_SQL: &str =
    include_str!("../sql/list_active_instances_owned_by.sql");
const LIST_INSTANCES_SHARED_WITH_SQL: &str = include_str!("../sql/list_instances_shared_with.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInstancesRepository;

impl PgInstancesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_active_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        locker: LockerId,
    ) -> Result<Option<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(FIND_ACTIVE_INSTANCE_SQL)
            .bind(locker.as_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_active_instance`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_active_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        locker: LockerId,
    ) -> Result<Option<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LOCK_ACTIVE_INSTANCE_SQL)
            .bind(locker.as_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: InstanceKey,
    ) -> Result<Option<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(GET_INSTANCE_SQL)
            .bind(key.locker_id.as_i64())
            .bind(SqlxTimestamp::from(key.start_time))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: InstanceKey,
    ) -> Result<Option<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LOCK_INSTANCE_SQL)
            .bind(key.locker_id.as_i64())
            .bind(SqlxTimestamp::from(key.start_time))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Inserts an open rental stamped with the database clock.
    ///
    /// Fails with a unique violation when the locker already has an open rental.
    pub(crate) async fn create_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        locker: LockerId,
        owner: &NationalId,
    ) -> Result<LockerInstanceRecord, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(CREATE_INSTANCE_SQL)
            .bind(locker.as_i64())
            .bind(owner.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Closes the rental if it is still open.
    pub(crate) async fn close_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: InstanceKey,
    ) -> Result<Option<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(CLOSE_INSTANCE_SQL)
            .bind(key.locker_id.as_i64())
            .bind(SqlxTimestamp::from(key.start_time))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_instance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: InstanceKey,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_INSTANCE_SQL)
            .bind(key.locker_id.as_i64())
            .bind(SqlxTimestamp::from(key.start_time))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_instances(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LIST_INSTANCES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_instances(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LIST_ACTIVE_INSTANCES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_instances_owned_by(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: &NationalId,
    ) -> Result<Vec<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LIST_ACTIVE_INSTANCES_OWNED_BY_SQL)
            .bind(owner.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_instances_shared_with(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NationalId,
    ) -> Result<Vec<LockerInstanceRecord>, sqlx::Error> {
        query_as::<Postgres, LockerInstanceRecord>(LIST_INSTANCES_SHARED_WITH_SQL)
            .bind(user.as_str())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LockerInstanceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            locker_id: LockerId::new(row.try_get("locker_id")?),
            start_time: row.try_get::<SqlxTimestamp, _>("start_time")?.to_jiff(),
            end_time: row
                .try_get::<Option<SqlxTimestamp>, _>("end_time")?
                .map(SqlxTimestamp::to_jiff),
            in_used: row.try_get("in_used")?,
            owner: NationalId::new(row.try_get::<String, _>("owner_national_id")?),
        })
    }
}
