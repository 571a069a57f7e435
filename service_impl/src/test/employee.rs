use crate::employee::{full_name_failures, EmployeeServiceImpl};
use crate::test::{test_forbidden, test_validation_error, AuthExt};
use dao::employee::{EmployeeEntity, MockEmployeeDao};
use mockall::predicate::eq;
use service::clock::MockClockService;
use service::employee::{Employee, EmployeeService};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ValidationFailureItem};
use time::macros::datetime;
use uuid::{uuid, Uuid};

pub fn default_id() -> Uuid {
    uuid!("4A818852-45D2-400F-A02A-755D34FFE815")
}
pub fn default_version() -> Uuid {
    uuid!("FAC4FAD9-89AE-4E56-9608-03C56558B192")
}
pub fn default_branch_id() -> Uuid {
    uuid!("682DA62E-20CB-49D9-A2A7-3F53C6842405")
}

pub fn generate_default_entity() -> EmployeeEntity {
    EmployeeEntity {
        id: default_id(),
        full_name: "Иванова Анна Сергеевна".into(),
        branch_id: Some(default_branch_id()),
        is_manager: false,
        is_leader: false,
        deleted: None,
        version: default_version(),
    }
}

pub struct EmployeeServiceDependencies {
    pub employee_dao: MockEmployeeDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl EmployeeServiceDependencies {
    pub fn build_service(
        self,
    ) -> EmployeeServiceImpl<MockEmployeeDao, MockPermissionService, MockClockService, MockUuidService>
    {
        EmployeeServiceImpl::new(
            self.employee_dao.into(),
            self.permission_service.into(),
            self.clock_service.into(),
            self.uuid_service.into(),
        )
    }
}

pub fn build_dependencies(permission: bool) -> EmployeeServiceDependencies {
    let employee_dao = MockEmployeeDao::new();
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

    EmployeeServiceDependencies {
        employee_dao,
        permission_service,
        clock_service,
        uuid_service,
    }
}

#[test]
fn test_full_name_validation() {
    assert!(full_name_failures("Иванова Анна Сергеевна").is_empty());
    assert!(full_name_failures("Петрова-Водкина Ёлка").is_empty());
    assert_eq!(
        full_name_failures("Ivanova Anna"),
        vec![ValidationFailureItem::InvalidCharacters("full_name".into())]
    );
    assert_eq!(
        full_name_failures("Иванова А.С."),
        vec![ValidationFailureItem::InvalidCharacters("full_name".into())]
    );
    assert_eq!(
        full_name_failures("   "),
        vec![ValidationFailureItem::Empty("full_name".into())]
    );
}

#[tokio::test]
async fn test_create_employee() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("employee-id"))
        .returning(|_| default_id());
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("employee-version"))
        .returning(|_| default_version());
    dependencies
        .employee_dao
        .expect_create()
        .withf(|entity, process| entity.id == default_id() && process == "employee-service")
        .returning(|_, _| Ok(()));
    let employee_service = dependencies.build_service();

    let created = employee_service
        .create(
            &Employee {
                id: Uuid::nil(),
                full_name: "Иванова Анна Сергеевна".into(),
                // Unassigned employees are valid.
                branch_id: None,
                is_manager: false,
                is_leader: false,
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await
        .unwrap();
    assert_eq!(created.id, default_id());
    assert_eq!(created.version, default_version());
}

#[tokio::test]
async fn test_create_employee_with_latin_name_fails() {
    let dependencies = build_dependencies(true);
    let employee_service = dependencies.build_service();

    let result = employee_service
        .create(
            &Employee {
                id: Uuid::nil(),
                full_name: "John Smith".into(),
                branch_id: None,
                is_manager: false,
                is_leader: false,
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::InvalidCharacters("full_name".into()),
    );
}

#[tokio::test]
async fn test_create_employee_forbidden() {
    let dependencies = build_dependencies(false);
    let employee_service = dependencies.build_service();

    let result = employee_service
        .create(
            &Employee {
                id: Uuid::nil(),
                full_name: "Иванова Анна".into(),
                branch_id: None,
                is_manager: false,
                is_leader: false,
                deleted: None,
                version: Uuid::nil(),
            },
            ().auth(),
        )
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_get_by_branch_ordered_by_full_name() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .employee_dao
        .expect_find_by_branch()
        .with(eq(default_branch_id()))
        .returning(|_| {
            Ok([
                EmployeeEntity {
                    id: uuid!("AAB7E3F0-8A4B-4E3F-BE32-9F2F6A1E8D21"),
                    full_name: "Смирнова Ольга".into(),
                    ..generate_default_entity()
                },
                generate_default_entity(),
            ]
            .into())
        });
    let employee_service = dependencies.build_service();

    let employees = employee_service
        .get_by_branch(default_branch_id(), ().auth())
        .await
        .unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].full_name.as_ref(), "Иванова Анна Сергеевна");
    assert_eq!(employees[1].full_name.as_ref(), "Смирнова Ольга");
}

#[tokio::test]
async fn test_get_employee_current_user() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .permission_service
        .expect_current_user_id()
        .with(eq(().auth()))
        .returning(|_| Ok(Some("anna".into())));
    dependencies
        .employee_dao
        .expect_find_employee_by_user()
        .with(eq("anna"))
        .returning(|_| Ok(Some(generate_default_entity())));
    let employee_service = dependencies.build_service();

    let employee = employee_service
        .get_employee_current_user(().auth())
        .await
        .unwrap();
    assert_eq!(employee.unwrap().id, default_id());
}

#[tokio::test]
async fn test_get_employee_current_user_unbound() {
    let mut dependencies = build_dependencies(true);
    dependencies
        .permission_service
        .expect_current_user_id()
        .with(eq(().auth()))
        .returning(|_| Ok(Some("nobody".into())));
    dependencies
        .employee_dao
        .expect_find_employee_by_user()
        .with(eq("nobody"))
        .returning(|_| Ok(None));
    let employee_service = dependencies.build_service();

    let employee = employee_service
        .get_employee_current_user(().auth())
        .await
        .unwrap();
    assert!(employee.is_none());
}
