use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

pub mod attendance;
pub mod branch;
pub mod calendar;
pub mod clock;
pub mod employee;
pub mod period;
pub mod permission;
pub mod statistics;
pub mod timesheet;
pub mod user_service;
pub mod uuid_service;

pub use permission::{Authentication, MockPermissionService, PermissionService};
pub use user_service::{MockUserService, UserService};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationFailureItem {
    #[error("Field '{0}' must not be empty")]
    Empty(Arc<str>),

    #[error("Field '{0}' contains invalid characters")]
    InvalidCharacters(Arc<str>),

    #[error("Modification of field '{0}' is not allowed")]
    ModificationNotAllowed(Arc<str>),

    #[error("Unknown attendance status token '{0}'")]
    UnknownStatus(Arc<str>),

    #[error("A root branch cannot be subordinated to another branch")]
    RootWithParent,

    #[error("Parent branch {0} is not a root branch")]
    ParentNotRoot(Uuid),

    #[error("A branch cannot be its own parent")]
    SelfParent,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Entity not found")]
    EntityNotFoundGeneric,

    #[error("Entity {0} already exists")]
    EntityAlreadyExists(Uuid),

    #[error("Entity {0} conflicts, expected version {1} but got {2}")]
    EntityConflicts(Uuid, Uuid, Uuid),

    #[error("Validation failed: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("ID must not be set on create")]
    IdSetOnCreate,

    #[error("Version must not be set on create")]
    VersionSetOnCreate,

    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),

    #[error("Invalid date: {0}")]
    DateUtilsError(#[from] tabel_utils::TabelDateUtilsError),
}
