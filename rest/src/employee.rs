use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::employee::EmployeeService;
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct EmployeeTO {
    #[serde(default)]
    pub id: Uuid,
    pub full_name: Arc<str>,
    #[serde(default)]
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}

impl From<&service::employee::Employee> for EmployeeTO {
    fn from(employee: &service::employee::Employee) -> Self {
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
impl From<&EmployeeTO> for service::employee::Employee {
    fn from(employee: &EmployeeTO) -> Self {
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

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_employees::<RestState>))
        .route("/", post(create_employee::<RestState>))
        .route("/current", get(get_current_employee::<RestState>))
        .route("/{id}", get(get_employee::<RestState>))
        .route("/{id}", put(update_employee::<RestState>))
        .route("/{id}/user", post(set_employee_user::<RestState>))
}

pub async fn get_all_employees<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let employees: Arc<[EmployeeTO]> = rest_state
                .employee_service()
                .get_all(().into())
                .await?
                .iter()
                .map(EmployeeTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&employees).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(employee_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .get(employee_id, ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&employee).unwrap()))
                .unwrap())
        })
        .await,
    )
}

/// The employee profile bound to the authenticated user. A missing binding
/// is a 404; the caller redirects to its access-denied path.
pub async fn get_current_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let employee = rest_state
                .employee_service()
                .get_employee_current_user(().into())
                .await?
                .ok_or(service::ServiceError::EntityNotFoundGeneric)?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(
                    serde_json::to_string(&EmployeeTO::from(&employee)).unwrap(),
                ))
                .unwrap())
        })
        .await,
    )
}

pub async fn create_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(employee): Json<EmployeeTO>,
) -> Response {
    error_handler(
        (async {
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .create(&(&employee).into(), ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&employee).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn update_employee<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(employee_id): Path<Uuid>,
    Json(employee): Json<EmployeeTO>,
) -> Response {
    error_handler(
        (async {
            if employee_id != employee.id {
                return Err(RestError::InconsistentId(employee_id, employee.id));
            }
            let employee = EmployeeTO::from(
                &rest_state
                    .employee_service()
                    .update(&(&employee).into(), ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&employee).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn set_employee_user<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(employee_id): Path<Uuid>,
    Json(user): Json<Option<Arc<str>>>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .employee_service()
                .set_user(employee_id, user, ().into())
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::empty())
                .unwrap())
        })
        .await,
    )
}
