use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub id: Uuid,
    pub name: Arc<str>,
    pub address: Arc<str>,
    pub phone: Arc<str>,
    pub is_root: bool,
    pub parent_id: Option<Uuid>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::branch::BranchEntity> for Branch {
    fn from(branch: &dao::branch::BranchEntity) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
            address: branch.address.clone(),
            phone: branch.phone.clone(),
            is_root: branch.is_root,
            parent_id: branch.parent_id,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}

impl From<&Branch> for dao::branch::BranchEntity {
    fn from(branch: &Branch) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
            address: branch.address.clone(),
            phone: branch.phone.clone(),
            is_root: branch.is_root,
            parent_id: branch.parent_id,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}

#[automock(type Context=();)]
#[async_trait]
pub trait BranchService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[Branch]>, ServiceError>;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError>;

    async fn create(
        &self,
        item: &Branch,
        context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError>;

    async fn update(
        &self,
        item: &Branch,
        context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError>;

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    /// The management scope of a branch: the branch itself first, then its
    /// direct children ordered by name. `None` resolves to the empty scope;
    /// callers must treat that as a denial, never as "all branches".
    async fn branches_under_management(
        &self,
        branch_id: Option<Uuid>,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[Branch]>, ServiceError>;
}
