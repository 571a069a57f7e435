use std::sync::Arc;

use crate::ResultDbErrorExt;
use async_trait::async_trait;
use dao::branch::{BranchDao, BranchEntity};
use dao::DaoError;
use sqlx::SqlitePool;
use time::format_description::well_known::Iso8601;
use time::PrimitiveDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct BranchDb {
    id: Vec<u8>,
    name: String,
    address: String,
    phone: String,
    is_root: i64,
    parent_id: Option<Vec<u8>>,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&BranchDb> for BranchEntity {
    type Error = DaoError;

    fn try_from(row: &BranchDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id)?,
            name: row.name.as_str().into(),
            address: row.address.as_str().into(),
            phone: row.phone.as_str().into(),
            is_root: row.is_root != 0,
            parent_id: row
                .parent_id
                .as_ref()
                .map(|parent_id| Uuid::from_slice(parent_id))
                .transpose()?,
            deleted: row
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&row.update_version)?,
        })
    }
}

const BRANCH_COLUMNS: &str = "id, name, address, phone, is_root, parent_id, deleted, update_version";

pub struct BranchDaoImpl {
    pool: Arc<SqlitePool>,
}
impl BranchDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchDao for BranchDaoImpl {
    async fn all(&self) -> Result<Arc<[BranchEntity]>, DaoError> {
        let rows: Vec<BranchDb> = sqlx::query_as(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branch ORDER BY name"
        ))
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        rows.iter().map(BranchEntity::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BranchEntity>, DaoError> {
        let row: Option<BranchDb> = sqlx::query_as(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branch WHERE id = ?"
        ))
        .bind(id.as_bytes().to_vec())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_db_error()?;
        row.as_ref().map(BranchEntity::try_from).transpose()
    }

    async fn find_by_parent(&self, parent_id: Uuid) -> Result<Arc<[BranchEntity]>, DaoError> {
        let rows: Vec<BranchDb> = sqlx::query_as(&format!(
            "SELECT {BRANCH_COLUMNS} FROM branch WHERE parent_id = ? AND deleted IS NULL ORDER BY name"
        ))
        .bind(parent_id.as_bytes().to_vec())
        .fetch_all(self.pool.as_ref())
        .await
        .map_db_error()?;
        rows.iter().map(BranchEntity::try_from).collect()
    }

    async fn create(&self, entity: &BranchEntity, process: &str) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        sqlx::query(
            r"INSERT INTO branch (id, name, address, phone, is_root, parent_id, deleted, update_version, update_process)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.name.as_ref())
        .bind(entity.address.as_ref())
        .bind(entity.phone.as_ref())
        .bind(entity.is_root as i64)
        .bind(entity.parent_id.map(|parent_id| parent_id.as_bytes().to_vec()))
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(&self, entity: &BranchEntity, process: &str) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        sqlx::query(
            r"UPDATE branch
              SET name = ?, address = ?, phone = ?, is_root = ?, parent_id = ?, deleted = ?, update_version = ?, update_process = ?
              WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(entity.address.as_ref())
        .bind(entity.phone.as_ref())
        .bind(entity.is_root as i64)
        .bind(entity.parent_id.map(|parent_id| parent_id.as_bytes().to_vec()))
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(self.pool.as_ref())
        .await
        .map_db_error()?;
        Ok(())
    }
}
