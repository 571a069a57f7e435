use std::sync::Arc;

use crate::branch::BranchServiceImpl;
use crate::test::{test_forbidden, test_not_found, test_validation_error, AuthExt};
use dao::branch::{BranchEntity, MockBranchDao};
use mockall::predicate::eq;
use service::branch::{Branch, BranchService};
use service::clock::MockClockService;
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ValidationFailureItem};
use time::macros::datetime;
use uuid::{uuid, Uuid};

pub fn root_id() -> Uuid {
    uuid!("682DA62E-20CB-49D9-A2A7-3F53C6842405")
}
pub fn child_a_id() -> Uuid {
    uuid!("DA703BC1-F488-4E4F-BA10-0972196639F7")
}
pub fn child_b_id() -> Uuid {
    uuid!("0B17E3F0-8A4B-4E3F-BE32-9F2F6A1E8D21")
}
pub fn default_version() -> Uuid {
    uuid!("86DE856C-D176-4F1F-A4FE-0D9844C02C03")
}

pub fn generate_root_entity() -> BranchEntity {
    BranchEntity {
        id: root_id(),
        name: "Центральная".into(),
        address: "ул. Ленина, 1".into(),
        phone: "+79000000001".into(),
        is_root: true,
        parent_id: None,
        deleted: None,
        version: default_version(),
    }
}

pub fn generate_child_entity(id: Uuid, name: &str) -> BranchEntity {
    BranchEntity {
        id,
        name: name.into(),
        address: "ул. Мира, 2".into(),
        phone: "+79000000002".into(),
        is_root: false,
        parent_id: Some(root_id()),
        deleted: None,
        version: default_version(),
    }
}

pub struct BranchServiceDependencies {
    pub branch_dao: MockBranchDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl BranchServiceDependencies {
    pub fn build_service(
        self,
    ) -> BranchServiceImpl<MockBranchDao, MockPermissionService, MockClockService, MockUuidService>
    {
        BranchServiceImpl::new(
            self.branch_dao.into(),
            self.permission_service.into(),
            self.clock_service.into(),
            self.uuid_service.into(),
        )
    }
}

pub fn build_dependencies(permission: bool) -> BranchServiceDependencies {
    let branch_dao = MockBranchDao::new();
    let mut permission_service = MockPermissionService::new();
    permission_service
        .expect_check_permission()
        .with(eq("admin"), eq(().auth()))
        .returning(move |_, _| {
            if permission {
                Ok(())
            } else {
                Err(service::ServiceError::Forbidden)
            }
        });
    let mut clock_service = MockClockService::new();
    clock_service
        .expect_date_time_now()
        .returning(|| datetime!(2024-03-15 12:00:00));
    let uuid_service = MockUuidService::new();

    BranchServiceDependencies {
        branch_dao,
        permission_service,
        clock_service,
        uuid_service,
    }
}

#[tokio::test]
async fn test_branches_under_management_root_first() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(root_id()))
        .returning(|_| Ok(Some(generate_root_entity())));
    dependencies
        .branch_dao
        .expect_find_by_parent()
        .with(eq(root_id()))
        .returning(|_| {
            // Unsorted on purpose: the service orders children by name.
            Ok(Arc::new([
                generate_child_entity(child_b_id(), "Филиал Б"),
                generate_child_entity(child_a_id(), "Филиал А"),
            ]))
        });
    let branch_service = dependencies.build_service();

    let scope = branch_service
        .branches_under_management(Some(root_id()), ().auth())
        .await
        .unwrap();

    assert_eq!(scope.len(), 3);
    assert_eq!(scope[0].id, root_id(), "Own branch must come first");
    assert_eq!(scope[1].name.as_ref(), "Филиал А");
    assert_eq!(scope[2].name.as_ref(), "Филиал Б");
}

#[tokio::test]
async fn test_branches_under_management_none_is_empty() {
    let dependencies = build_dependencies(true);
    let branch_service = dependencies.build_service();

    let scope = branch_service
        .branches_under_management(None, ().auth())
        .await
        .unwrap();
    assert!(scope.is_empty());
}

#[tokio::test]
async fn test_branches_under_management_missing_branch() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(root_id()))
        .returning(|_| Ok(None));
    let branch_service = dependencies.build_service();

    let result = branch_service
        .branches_under_management(Some(root_id()), ().auth())
        .await;
    test_not_found(&result, &root_id());
}

#[tokio::test]
async fn test_create_branch() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("branch-id"))
        .returning(|_| root_id());
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("branch-version"))
        .returning(|_| default_version());
    dependencies
        .branch_dao
        .expect_create()
        .withf(|entity, process| {
            entity.id == root_id()
                && entity.version == default_version()
                && process == "branch-service"
        })
        .returning(|_, _| Ok(()));
    let branch_service = dependencies.build_service();

    let created = branch_service
        .create(
            &Branch {
                id: Uuid::nil(),
                name: "Центральная".into(),
                address: "ул. Ленина, 1".into(),
                phone: "+79000000001".into(),
                is_root: true,
                parent_id: None,
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await
        .unwrap();
    assert_eq!(created.id, root_id());
    assert_eq!(created.version, default_version());
}

#[tokio::test]
async fn test_create_branch_forbidden() {
    let dependencies = build_dependencies(false);
    let branch_service = dependencies.build_service();

    let result = branch_service
        .create(
            &Branch {
                id: Uuid::nil(),
                name: "Центральная".into(),
                address: "ул. Ленина, 1".into(),
                phone: "".into(),
                is_root: true,
                parent_id: None,
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_root_branch_with_parent_fails() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(root_id()))
        .returning(|_| Ok(Some(generate_root_entity())));
    let branch_service = dependencies.build_service();

    let result = branch_service
        .create(
            &Branch {
                id: Uuid::nil(),
                name: "Филиал В".into(),
                address: "ул. Мира, 3".into(),
                phone: "".into(),
                is_root: true,
                parent_id: Some(root_id()),
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await;
    test_validation_error(&result, &ValidationFailureItem::RootWithParent);
}

#[tokio::test]
async fn test_create_branch_with_non_root_parent_fails() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(child_a_id()))
        .returning(|_| Ok(Some(generate_child_entity(child_a_id(), "Филиал А"))));
    let branch_service = dependencies.build_service();

    let result = branch_service
        .create(
            &Branch {
                id: Uuid::nil(),
                name: "Филиал В".into(),
                address: "ул. Мира, 3".into(),
                phone: "".into(),
                is_root: false,
                parent_id: Some(child_a_id()),
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await;
    test_validation_error(&result, &ValidationFailureItem::ParentNotRoot(child_a_id()));
}

#[tokio::test]
async fn test_update_branch_self_parent_fails() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(root_id()))
        .returning(|_| Ok(Some(generate_root_entity())));
    let branch_service = dependencies.build_service();

    let result = branch_service
        .update(
            &Branch {
                parent_id: Some(root_id()),
                is_root: false,
                ..Branch::from(&generate_root_entity())
            },
            ().auth(),
        )
        .await;
    test_validation_error(&result, &ValidationFailureItem::SelfParent);
}

#[tokio::test]
async fn test_delete_branch_is_soft() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .branch_dao
        .expect_find_by_id()
        .with(eq(root_id()))
        .returning(|_| Ok(Some(generate_root_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("branch-version"))
        .returning(|_| default_version());
    dependencies
        .branch_dao
        .expect_update()
        .withf(|entity, _| entity.id == root_id() && entity.deleted.is_some())
        .returning(|_, _| Ok(()));
    let branch_service = dependencies.build_service();

    branch_service.delete(root_id(), ().auth()).await.unwrap();
}
