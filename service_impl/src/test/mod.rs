pub mod branch;
pub mod calendar;
pub mod employee;
pub mod period;

use service::permission::Authentication;
use service::ServiceError;
use uuid::Uuid;

pub trait AuthExt {
    fn auth(self) -> Authentication<()>;
}
impl AuthExt for () {
    fn auth(self) -> Authentication<()> {
        Authentication::Context(())
    }
}

pub fn test_forbidden<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::Forbidden) = result {
        // All good
    } else {
        panic!("Expected forbidden error");
    }
}

pub fn test_not_found<T>(result: &Result<T, ServiceError>, target_id: &Uuid) {
    if let Err(ServiceError::EntityNotFound(id)) = result {
        assert_eq!(
            id, target_id,
            "Expected entity {} not found but got {}",
            target_id, id
        );
    } else {
        panic!("Expected entity {} not found error", target_id);
    }
}

pub fn test_validation_error<T>(
    result: &Result<T, ServiceError>,
    validation_failure: &service::ValidationFailureItem,
) {
    if let Err(ServiceError::ValidationError(items)) = result {
        assert!(
            items.contains(validation_failure),
            "Validation failure not found: {:?} in {:?}",
            validation_failure,
            items
        );
    } else {
        panic!("Expected validation error");
    }
}
