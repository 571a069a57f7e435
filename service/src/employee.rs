use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: Arc<str>,
    pub branch_id: Option<Uuid>,
    pub is_manager: bool,
    pub is_leader: bool,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::employee::EmployeeEntity> for Employee {
    fn from(employee: &dao::employee::EmployeeEntity) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name.clone(),
            branch_id: employee.branch_id,
            is_manager: employee.is_manager,
            is_leader: employee.is_leader,
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}

impl From<&Employee> for dao::employee::EmployeeEntity {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name.clone(),
            branch_id: employee.branch_id,
            is_manager: employee.is_manager,
            is_leader: employee.is_leader,
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}

#[automock(type Context=();)]
#[async_trait]
pub trait EmployeeService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[Employee]>, ServiceError>;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError>;

    /// Active employees of a branch, ordered by full name.
    async fn get_by_branch(
        &self,
        branch_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[Employee]>, ServiceError>;

    async fn create(
        &self,
        item: &Employee,
        context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError>;

    async fn update(
        &self,
        item: &Employee,
        context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError>;

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    async fn get_assigned_user(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Arc<str>>, ServiceError>;

    async fn set_user(
        &self,
        employee_id: Uuid,
        user_id: Option<Arc<str>>,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    async fn get_employee_for_user(
        &self,
        user_id: Arc<str>,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Employee>, ServiceError>;

    /// The employee profile bound to the authenticated user, if any.
    async fn get_employee_current_user(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Employee>, ServiceError>;
}
