use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, PrivilegeEntity, UserEntity};
use sqlx::SqlitePool;

pub mod attendance;
pub mod branch;
pub mod employee;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

#[derive(sqlx::FromRow)]
struct NameRow {
    name: String,
}

pub struct PermissionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl PermissionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl dao::PermissionDao for PermissionDaoImpl {
    async fn has_privilege(&self, user: &str, privilege: &str) -> Result<bool, DaoError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT count(*) FROM user
              INNER JOIN user_role ON user.name = user_role.user_name
              INNER JOIN role ON user_role.role_name = role.name
              INNER JOIN role_privilege ON role.name = role_privilege.role_name
              WHERE role_privilege.privilege_name = ? AND user.name = ?",
        )
        .bind(privilege)
        .bind(user)
        .fetch_one(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(count > 0)
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserEntity>, DaoError> {
        let row: Option<NameRow> = sqlx::query_as(r"SELECT name FROM user WHERE name = ?")
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(row.map(|row| UserEntity {
            name: row.name.into(),
        }))
    }

    async fn all_users(&self) -> Result<Arc<[UserEntity]>, DaoError> {
        let rows: Vec<NameRow> = sqlx::query_as(r"SELECT name FROM user ORDER BY name")
            .fetch_all(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(rows
            .into_iter()
            .map(|row| UserEntity {
                name: row.name.into(),
            })
            .collect())
    }

    async fn create_user(&self, user: &UserEntity, process: &str) -> Result<(), DaoError> {
        sqlx::query(r"INSERT INTO user (name, update_process) VALUES (?, ?)")
            .bind(user.name.as_ref())
            .bind(process)
            .execute(self.pool.as_ref())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn add_user_role(&self, user: &str, role: &str, process: &str) -> Result<(), DaoError> {
        sqlx::query(
            r"INSERT INTO user_role (user_name, role_name, update_process) VALUES (?, ?, ?)",
        )
        .bind(user)
        .bind(role)
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn privileges_for_user(&self, user: &str) -> Result<Arc<[PrivilegeEntity]>, DaoError> {
        let rows: Vec<NameRow> = sqlx::query_as(
            r"SELECT privilege.name as name FROM user
              INNER JOIN user_role ON user.name = user_role.user_name
              INNER JOIN role ON user_role.role_name = role.name
              INNER JOIN role_privilege ON role.name = role_privilege.role_name
              INNER JOIN privilege ON role_privilege.privilege_name = privilege.name
              WHERE user.name = ?",
        )
        .bind(user)
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(rows
            .into_iter()
            .map(|row| PrivilegeEntity {
                name: row.name.into(),
            })
            .collect())
    }
}
