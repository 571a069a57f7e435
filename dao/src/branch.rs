use std::sync::Arc;

use crate::DaoError;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub address: Arc<str>,
    pub phone: Arc<str>,
    pub is_root: bool,
    pub parent_id: Option<Uuid>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock]
#[async_trait]
pub trait BranchDao {
    async fn all(&self) -> Result<Arc<[BranchEntity]>, DaoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BranchEntity>, DaoError>;
    async fn find_by_parent(&self, parent_id: Uuid) -> Result<Arc<[BranchEntity]>, DaoError>;
    async fn create(&self, entity: &BranchEntity, process: &str) -> Result<(), DaoError>;
    async fn update(&self, entity: &BranchEntity, process: &str) -> Result<(), DaoError>;
}
