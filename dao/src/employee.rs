use std::sync::Arc;

use crate::DaoError;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub full_name: Arc<str>,
    pub branch_id: Option<Uuid>,
    pub is_manager: bool,
    pub is_leader: bool,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock]
#[async_trait]
pub trait EmployeeDao {
    async fn all(&self) -> Result<Arc<[EmployeeEntity]>, DaoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, DaoError>;

    /// Active employees of one branch, ordered by full name.
    async fn find_by_branch(&self, branch_id: Uuid) -> Result<Arc<[EmployeeEntity]>, DaoError>;

    async fn create(&self, entity: &EmployeeEntity, process: &str) -> Result<(), DaoError>;
    async fn update(&self, entity: &EmployeeEntity, process: &str) -> Result<(), DaoError>;

    async fn get_assigned_user(&self, employee_id: Uuid) -> Result<Option<Arc<str>>, DaoError>;
    async fn assign_to_user(
        &self,
        employee_id: Uuid,
        username: &str,
        process: &str,
    ) -> Result<(), DaoError>;
    async fn discard_assigned_user(&self, employee_id: Uuid) -> Result<(), DaoError>;
    async fn find_employee_by_user(
        &self,
        username: &str,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
}
