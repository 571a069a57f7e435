use std::sync::Arc;

use crate::ResultDbErrorExt;
use async_trait::async_trait;
use dao::employee::{EmployeeDao, EmployeeEntity};
use dao::DaoError;
use sqlx::SqlitePool;
use time::format_description::well_known::Iso8601;
use time::PrimitiveDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct EmployeeDb {
    id: Vec<u8>,
    full_name: String,
    branch_id: Option<Vec<u8>>,
    is_manager: i64,
    is_leader: i64,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&EmployeeDb> for EmployeeEntity {
    type Error = DaoError;

    fn try_from(row: &EmployeeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id)?,
            full_name: row.full_name.as_str().into(),
            branch_id: row
                .branch_id
                .as_ref()
                .map(|branch_id| Uuid::from_slice(branch_id))
                .transpose()?,
            is_manager: row.is_manager != 0,
            is_leader: row.is_leader != 0,
            deleted: row
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&row.update_version)?,
        })
    }
}

const EMPLOYEE_COLUMNS: &str =
    "id, full_name, branch_id, is_manager, is_leader, deleted, update_version";

pub struct EmployeeDaoImpl {
    pool: Arc<SqlitePool>,
}
impl EmployeeDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDao for EmployeeDaoImpl {
    async fn all(&self) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        let rows: Vec<EmployeeDb> = sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY full_name"
        ))
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        rows.iter().map(EmployeeEntity::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, DaoError> {
        let row: Option<EmployeeDb> = sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE id = ?"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_db_error()?;
        row.as_ref().map(EmployeeEntity::try_from).transpose()
    }

    async fn find_by_branch(&self, branch_id: Uuid) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        let rows: Vec<EmployeeDb> = sqlx::query_as(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE branch_id = ? AND deleted IS NULL ORDER BY full_name"
        ))
        .bind(branch_id.as_bytes().to_vec())
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        rows.iter().map(EmployeeEntity::try_from).collect()
    }

    async fn create(&self, entity: &EmployeeEntity, process: &str) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        sqlx::query(
            r"INSERT INTO employee (id, full_name, branch_id, is_manager, is_leader, deleted, update_version, update_process)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.full_name.as_ref())
        .bind(entity.branch_id.map(|branch_id| branch_id.as_bytes().to_vec()))
        .bind(entity.is_manager as i64)
        .bind(entity.is_leader as i64)
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(&self, entity: &EmployeeEntity, process: &str) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        sqlx::query(
            r"UPDATE employee
              SET full_name = ?, branch_id = ?, is_manager = ?, is_leader = ?, deleted = ?, update_version = ?, update_process = ?
              WHERE id = ?",
        )
        .bind(entity.full_name.as_ref())
        .bind(entity.branch_id.map(|branch_id| branch_id.as_bytes().to_vec()))
        .bind(entity.is_manager as i64)
        .bind(entity.is_leader as i64)
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn get_assigned_user(&self, employee_id: Uuid) -> Result<Option<Arc<str>>, DaoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r"SELECT user_name FROM employee_user WHERE employee_id = ?")
                .bind(employee_id.as_bytes().to_vec())
                .fetch_optional(self.pool.as_ref())
                .await
                .map_db_error()?;
        Ok(row.map(|(user_name,)| user_name.into()))
    }

    async fn assign_to_user(
        &self,
        employee_id: Uuid,
        username: &str,
        process: &str,
    ) -> Result<(), DaoError> {
        sqlx::query(
            r"INSERT INTO employee_user (employee_id, user_name, update_process) VALUES (?, ?, ?)",
        )
        .bind(employee_id.as_bytes().to_vec())
        .bind(username)
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn discard_assigned_user(&self, employee_id: Uuid) -> Result<(), DaoError> {
        sqlx::query(r"DELETE FROM employee_user WHERE employee_id = ?")
            .bind(employee_id.as_bytes().to_vec())
            .execute(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn find_employee_by_user(
        &self,
        username: &str,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        let row: Option<EmployeeDb> = sqlx::query_as(
            r"SELECT employee.id as id, full_name, branch_id, is_manager, is_leader, deleted, update_version
              FROM employee
              INNER JOIN employee_user ON employee.id = employee_user.employee_id
              WHERE employee_user.user_name = ?",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_db_error()?;
        row.as_ref().map(EmployeeEntity::try_from).transpose()
    }
}
