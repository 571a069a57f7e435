use std::sync::Arc;

use crate::ResultDbErrorExt;
use async_trait::async_trait;
use dao::attendance::{AttendanceDao, AttendanceRecordEntity, AttendanceStatusEntity};
use dao::DaoError;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tabel_utils::DateRange;
use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

fn format_date(date: Date) -> Result<String, DaoError> {
    Ok(date.format(DATE_FORMAT)?)
}

#[derive(sqlx::FromRow)]
struct AttendanceDb {
    id: Vec<u8>,
    employee_id: Vec<u8>,
    date: String,
    status: String,
    created: String,
    updated: String,
    update_version: Vec<u8>,
}

impl TryFrom<&AttendanceDb> for AttendanceRecordEntity {
    type Error = DaoError;

    fn try_from(row: &AttendanceDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id)?,
            employee_id: Uuid::from_slice(&row.employee_id)?,
            date: Date::parse(&row.date, DATE_FORMAT)?,
            status: AttendanceStatusEntity::from_token(&row.status)
                .ok_or_else(|| DaoError::EnumValueNotFound(row.status.as_str().into()))?,
            created: PrimitiveDateTime::parse(&row.created, &Iso8601::DATE_TIME)?,
            updated: PrimitiveDateTime::parse(&row.updated, &Iso8601::DATE_TIME)?,
            version: Uuid::from_slice(&row.update_version)?,
        })
    }
}

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, date, status, created, updated, update_version";

pub struct AttendanceDaoImpl {
    pool: Arc<SqlitePool>,
}
impl AttendanceDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceDao for AttendanceDaoImpl {
    async fn find_by_employee_and_range(
        &self,
        employee_id: Uuid,
        range: DateRange,
    ) -> Result<Arc<[AttendanceRecordEntity]>, DaoError> {
        let rows: Vec<AttendanceDb> = sqlx::query_as(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_record
             WHERE employee_id = ? AND date BETWEEN ? AND ?
             ORDER BY date"
        ))
        .bind(employee_id.as_bytes().to_vec())
        .bind(format_date(range.start())?)
        .bind(format_date(range.end())?)
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        rows.iter().map(AttendanceRecordEntity::try_from).collect()
    }

    async fn find_by_employees_and_range(
        &self,
        employee_ids: &[Uuid],
        range: DateRange,
    ) -> Result<Arc<[AttendanceRecordEntity]>, DaoError> {
        if employee_ids.is_empty() {
            return Ok(Arc::new([]));
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_record WHERE date BETWEEN "
        ));
        builder.push_bind(format_date(range.start())?);
        builder.push(" AND ");
        builder.push_bind(format_date(range.end())?);
        builder.push(" AND employee_id IN (");
        let mut ids = builder.separated(", ");
        for employee_id in employee_ids {
            ids.push_bind(employee_id.as_bytes().to_vec());
        }
        ids.push_unseparated(")");
        builder.push(" ORDER BY employee_id, date");

        let rows: Vec<AttendanceDb> = builder
            .build_query_as()
            .fetch_all(self.pool.as_ref())
            .await
            .map_db_error()?;
        rows.iter().map(AttendanceRecordEntity::try_from).collect()
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: Date,
    ) -> Result<Option<AttendanceRecordEntity>, DaoError> {
        let row: Option<AttendanceDb> = sqlx::query_as(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_record WHERE employee_id = ? AND date = ?"
        ))
        .bind(employee_id.as_bytes().to_vec())
        .bind(format_date(date)?)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_db_error()?;
        row.as_ref().map(AttendanceRecordEntity::try_from).transpose()
    }

    async fn create(
        &self,
        entity: &AttendanceRecordEntity,
        process: &str,
    ) -> Result<(), DaoError> {
        sqlx::query(
            r"INSERT INTO attendance_record (id, employee_id, date, status, created, updated, update_version, update_process)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.employee_id.as_bytes().to_vec())
        .bind(format_date(entity.date)?)
        .bind(entity.status.as_token())
        .bind(entity.created.format(&Iso8601::DATE_TIME).map_db_error()?)
        .bind(entity.updated.format(&Iso8601::DATE_TIME).map_db_error()?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &AttendanceRecordEntity,
        process: &str,
    ) -> Result<(), DaoError> {
        sqlx::query(
            r"UPDATE attendance_record
              SET status = ?, updated = ?, update_version = ?, update_process = ?
              WHERE employee_id = ? AND date = ?",
        )
        .bind(entity.status.as_token())
        .bind(entity.updated.format(&Iso8601::DATE_TIME).map_db_error()?)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.employee_id.as_bytes().to_vec())
        .bind(format_date(entity.date)?)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }
}
