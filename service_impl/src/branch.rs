use std::sync::Arc;

use async_trait::async_trait;
use dao::branch::BranchEntity;
use service::branch::{Branch, BranchService};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::{ServiceError, ValidationFailureItem};
use uuid::Uuid;

pub struct BranchServiceImpl<BranchDao, PermissionService, ClockService, UuidService>
where
    BranchDao: dao::branch::BranchDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    branch_dao: Arc<BranchDao>,
    permission_service: Arc<PermissionService>,
    clock_service: Arc<ClockService>,
    uuid_service: Arc<UuidService>,
}

impl<BranchDao, PermissionService, ClockService, UuidService>
    BranchServiceImpl<BranchDao, PermissionService, ClockService, UuidService>
where
    BranchDao: dao::branch::BranchDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    pub fn new(
        branch_dao: Arc<BranchDao>,
        permission_service: Arc<PermissionService>,
        clock_service: Arc<ClockService>,
        uuid_service: Arc<UuidService>,
    ) -> Self {
        Self {
            branch_dao,
            permission_service,
            clock_service,
            uuid_service,
        }
    }

    /// Hierarchy invariants: depth is exactly two. A root has no parent, a
    /// child's parent must be a root and a branch may not be its own parent.
    async fn validate(&self, branch: &Branch) -> Result<(), ServiceError> {
        let mut failures: Vec<ValidationFailureItem> = Vec::new();
        if branch.name.trim().is_empty() {
            failures.push(ValidationFailureItem::Empty("name".into()));
        }
        if branch.is_root && branch.parent_id.is_some() {
            failures.push(ValidationFailureItem::RootWithParent);
        }
        if let Some(parent_id) = branch.parent_id {
            if parent_id == branch.id {
                failures.push(ValidationFailureItem::SelfParent);
            } else {
                match self.branch_dao.find_by_id(parent_id).await? {
                    Some(parent) if parent.is_root && parent.deleted.is_none() => {}
                    Some(_) => failures.push(ValidationFailureItem::ParentNotRoot(parent_id)),
                    None => return Err(ServiceError::EntityNotFound(parent_id)),
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(failures.into()))
        }
    }
}

const BRANCH_SERVICE_PROCESS: &str = "branch-service";

#[async_trait]
impl<BranchDao, PermissionService, ClockService, UuidService> BranchService
    for BranchServiceImpl<BranchDao, PermissionService, ClockService, UuidService>
where
    BranchDao: dao::branch::BranchDao + Send + Sync,
    PermissionService: service::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    type Context = PermissionService::Context;

    async fn get_all(
        &self,
        _context: Authentication<Self::Context>,
    ) -> Result<Arc<[Branch]>, ServiceError> {
        let mut branches: Vec<Branch> = self
            .branch_dao
            .all()
            .await?
            .iter()
            .filter(|branch| branch.deleted.is_none())
            .map(Branch::from)
            .collect();
        branches.sort_by(|a, b| b.is_root.cmp(&a.is_root).then(a.name.cmp(&b.name)));
        Ok(branches.into())
    }

    async fn get(
        &self,
        id: Uuid,
        _context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError> {
        self.branch_dao
            .find_by_id(id)
            .await?
            .as_ref()
            .map(Branch::from)
            .ok_or(ServiceError::EntityNotFound(id))
    }

    async fn create(
        &self,
        item: &Branch,
        context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        if item.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if item.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        self.validate(item).await?;

        let branch = Branch {
            id: self.uuid_service.new_uuid("branch-id"),
            version: self.uuid_service.new_uuid("branch-version"),
            ..item.clone()
        };
        self.branch_dao
            .create(&BranchEntity::from(&branch), BRANCH_SERVICE_PROCESS)
            .await?;
        Ok(branch)
    }

    async fn update(
        &self,
        item: &Branch,
        context: Authentication<Self::Context>,
    ) -> Result<Branch, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        let stored = self
            .branch_dao
            .find_by_id(item.id)
            .await?
            .as_ref()
            .map(Branch::from)
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
        self.validate(item).await?;

        let branch = Branch {
            version: self.uuid_service.new_uuid("branch-version"),
            ..item.clone()
        };
        self.branch_dao
            .update(&BranchEntity::from(&branch), BRANCH_SERVICE_PROCESS)
            .await?;
        Ok(branch)
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
            .branch_dao
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        if entity.deleted.is_some() {
            return Err(ServiceError::EntityNotFound(id));
        }
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("branch-version");
        self.branch_dao
            .update(&entity, BRANCH_SERVICE_PROCESS)
            .await?;
        Ok(())
    }

    async fn branches_under_management(
        &self,
        branch_id: Option<Uuid>,
        _context: Authentication<Self::Context>,
    ) -> Result<Arc<[Branch]>, ServiceError> {
        // An unassigned manager has an empty scope. Callers treat this as a
        // denial, never as a query over all branches.
        let Some(branch_id) = branch_id else {
            return Ok(Arc::new([]));
        };
        let branch = self
            .branch_dao
            .find_by_id(branch_id)
            .await?
            .as_ref()
            .map(Branch::from)
            .ok_or(ServiceError::EntityNotFound(branch_id))?;
        let mut children: Vec<Branch> = self
            .branch_dao
            .find_by_parent(branch_id)
            .await?
            .iter()
            .filter(|child| child.deleted.is_none())
            .map(Branch::from)
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        let mut scope = Vec::with_capacity(children.len() + 1);
        scope.push(branch);
        scope.extend(children);
        Ok(scope.into())
    }
}
