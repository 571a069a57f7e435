use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::EmployeeEntity;
use service::employee::{Employee, EmployeeService};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::{ServiceError, ValidationFailureItem};
use uuid::Uuid;

fn is_cyrillic_letter(c: char) -> bool {
    ('а'..='я').contains(&c) || ('А'..='Я').contains(&c) || c == 'ё' || c == 'Ё'
}

/// Full names are entered in Russian: Cyrillic letters, spaces and hyphens.
pub fn full_name_failures(full_name: &str) -> Vec<ValidationFailureItem> {
    let mut failures = Vec::new();
    if full_name.trim().is_empty() {
        failures.push(ValidationFailureItem::Empty("full_name".into()));
    } else if !full_name
        .chars()
        .all(|c| is_cyrillic_letter(c) || c == ' ' || c == '-')
    {
        failures.push(ValidationFailureItem::InvalidCharacters("full_name".into()));
    }
    failures
}

pub struct EmployeeServiceImpl<EmployeeDao, PermissionService, ClockService, UuidService>
where
    EmployeeDao: dao::employee::EmployeeDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    employee_dao: Arc<EmployeeDao>,
    permission_service: Arc<PermissionService>,
    clock_service: Arc<ClockService>,
    uuid_service: Arc<UuidService>,
}

impl<EmployeeDao, PermissionService, ClockService, UuidService>
    EmployeeServiceImpl<EmployeeDao, PermissionService, ClockService, UuidService>
where
    EmployeeDao: dao::employee::EmployeeDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    pub fn new(
        employee_dao: Arc<EmployeeDao>,
        permission_service: Arc<PermissionService>,
        clock_service: Arc<ClockService>,
        uuid_service: Arc<UuidService>,
    ) -> Self {
        Self {
            employee_dao,
            permission_service,
            clock_service,
            uuid_service,
        }
    }

    fn validate(employee: &Employee) -> Result<(), ServiceError> {
        let failures = full_name_failures(&employee.full_name);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(failures.into()))
        }
    }
}

const EMPLOYEE_SERVICE_PROCESS: &str = "employee-service";

#[async_trait]
impl<EmployeeDao, PermissionService, ClockService, UuidService> EmployeeService
    for EmployeeServiceImpl<EmployeeDao, PermissionService, ClockService, UuidService>
where
    EmployeeDao: dao::employee::EmployeeDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    type Context = PermissionService::Context;

    async fn get_all(
        &self,
        _context: Authentication<Self::Context>,
    ) -> Result<Arc<[Employee]>, ServiceError> {
        let mut employees: Vec<Employee> = self
            .employee_dao
            .all()
            .await?
            .iter()
            .filter(|employee| employee.deleted.is_none())
            .map(Employee::from)
            .collect();
        employees.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(employees.into())
    }

    async fn get(
        &self,
        id: Uuid,
        _context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError> {
        self.employee_dao
            .find_by_id(id)
            .await?
            .as_ref()
            .map(Employee::from)
            .ok_or(ServiceError::EntityNotFound(id))
    }

    async fn get_by_branch(
        &self,
        branch_id: Uuid,
        _context: Authentication<Self::Context>,
    ) -> Result<Arc<[Employee]>, ServiceError> {
        let mut employees: Vec<Employee> = self
            .employee_dao
            .find_by_branch(branch_id)
            .await?
            .iter()
            .filter(|employee| employee.deleted.is_none())
            .map(Employee::from)
            .collect();
        employees.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(employees.into())
    }

    async fn create(
        &self,
        item: &Employee,
        context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        if item.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if item.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        Self::validate(item)?;

        let employee = Employee {
            id: self.uuid_service.new_uuid("employee-id"),
            version: self.uuid_service.new_uuid("employee-version"),
            ..item.clone()
        };
        self.employee_dao
            .create(&EmployeeEntity::from(&employee), EMPLOYEE_SERVICE_PROCESS)
            .await?;
        Ok(employee)
    }

    async fn update(
        &self,
        item: &Employee,
        context: Authentication<Self::Context>,
    ) -> Result<Employee, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        let stored = self
            .employee_dao
            .find_by_id(item.id)
            .await?
            .as_ref()
            .map(Employee::from)
            .ok_or(ServiceError::EntityNotFound(item.id))?;

        if item.version != stored.version {
            return Err(ServiceError::EntityConflicts(
                item.id,
                stored.version,
                item.version,
            ));
        }
        if item.deleted != stored.deleted {
            return Err(ServiceError::ValidationError(
                [ValidationFailureItem::ModificationNotAllowed("deleted".into())].into(),
            ));
        }
        Self::validate(item)?;

        let employee = Employee {
            version: self.uuid_service.new_uuid("employee-version"),
            ..item.clone()
        };
        self.employee_dao
            .update(&EmployeeEntity::from(&employee), EMPLOYEE_SERVICE_PROCESS)
            .await?;
        Ok(employee)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let mut entity = self
            .employee_dao
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        if entity.deleted.is_some() {
            return Err(ServiceError::EntityNotFound(id));
        }
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("employee-version");
        self.employee_dao
            .update(&entity, EMPLOYEE_SERVICE_PROCESS)
            .await?;
        Ok(())
    }

    async fn get_assigned_user(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        Ok(self.employee_dao.get_assigned_user(employee_id).await?)
    }

    async fn set_user(
        &self,
        employee_id: Uuid,
        user_id: Option<Arc<str>>,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        self.employee_dao.discard_assigned_user(employee_id).await?;
        if let Some(user) = user_id {
            self.employee_dao
                .assign_to_user(employee_id, user.as_ref(), EMPLOYEE_SERVICE_PROCESS)
                .await?;
        }
        Ok(())
    }

    async fn get_employee_for_user(
        &self,
        user_id: Arc<str>,
        _context: Authentication<Self::Context>,
    ) -> Result<Option<Employee>, ServiceError> {
        Ok(self
            .employee_dao
            .find_employee_by_user(&user_id)
            .await?
            .as_ref()
            .map(Employee::from))
    }

    async fn get_employee_current_user(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Employee>, ServiceError> {
        let Some(current_user) = self.permission_service.current_user_id(context).await? else {
            return Ok(None);
        };
        self.get_employee_for_user(current_user, Authentication::Full)
            .await
    }
}
