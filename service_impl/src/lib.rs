use std::sync::Arc;

use async_trait::async_trait;

pub mod attendance;
pub mod branch;
pub mod calendar;
pub mod clock;
pub mod employee;
pub mod period;
pub mod permission;
pub mod statistics;
pub mod timesheet;
pub mod uuid_service;

#[cfg(test)]
mod test;

pub use permission::PermissionServiceImpl;

/// Always authenticates as DEVUSER. Used to run the backend locally without
/// a login service; selected by the `mock_auth` feature of the binary.
pub struct UserServiceDev;

#[async_trait]
impl service::UserService for UserServiceDev {
    type Context = ();

    async fn current_user(&self, _context: ()) -> Result<Arc<str>, service::ServiceError> {
        Ok("DEVUSER".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use service::permission::Authentication;
    use service::{PermissionService, UserService};

    #[tokio::test]
    async fn test_user_service_dev() {
        let user_service = UserServiceDev;
        assert_eq!(
            "DEVUSER",
            user_service.current_user(()).await.unwrap().as_ref()
        );
    }

    #[tokio::test]
    async fn test_check_permission_granted() {
        let mut permission_dao = dao::MockPermissionDao::new();
        permission_dao
            .expect_has_privilege()
            .with(eq("DEVUSER"), eq("admin"))
            .returning(|_, _| Ok(true));

        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(UserServiceDev));
        permission_service
            .check_permission("admin", Authentication::Context(()))
            .await
            .expect("Expected successful authorization");
    }

    #[tokio::test]
    async fn test_check_permission_denied() {
        let mut permission_dao = dao::MockPermissionDao::new();
        permission_dao
            .expect_has_privilege()
            .with(eq("DEVUSER"), eq("admin"))
            .returning(|_, _| Ok(false));

        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(UserServiceDev));
        let result = permission_service
            .check_permission("admin", Authentication::Context(()))
            .await;
        if let Err(service::ServiceError::Forbidden) = result {
            // All good
        } else {
            panic!("Expected forbidden error");
        }
    }

    #[tokio::test]
    async fn test_full_authentication_bypasses_privilege_check() {
        let permission_dao = dao::MockPermissionDao::new();
        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(UserServiceDev));
        permission_service
            .check_permission("admin", Authentication::Full)
            .await
            .expect("Full authentication must always pass");
    }
}
