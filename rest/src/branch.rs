use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::branch::BranchService;
use service::employee::EmployeeService;
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BranchTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    #[serde(default)]
    pub address: Arc<str>,
    #[serde(default)]
    pub phone: Arc<str>,
    pub is_root: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}

impl From<&service::branch::Branch> for BranchTO {
    fn from(branch: &service::branch::Branch) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
            address: branch.address.clone(),
            phone: branch.phone.clone(),
            is_root: branch.is_root,
            parent_id: branch.parent_id,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}
impl From<&BranchTO> for service::branch::Branch {
    fn from(branch: &BranchTO) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
            address: branch.address.clone(),
            phone: branch.phone.clone(),
            is_root: branch.is_root,
            parent_id: branch.parent_id,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_branches::<RestState>))
        .route("/", post(create_branch::<RestState>))
        .route("/management", get(get_branches_under_management::<RestState>))
        .route("/{id}", get(get_branch::<RestState>))
        .route("/{id}", put(update_branch::<RestState>))
}

pub async fn get_all_branches<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let branches: Arc<[BranchTO]> = rest_state
                .branch_service()
                .get_all(().into())
                .await?
                .iter()
                .map(BranchTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&branches).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(branch_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .get(branch_id, ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&branch).unwrap()))
                .unwrap())
        })
        .await,
    )
}

/// The calling manager's scope: own branch first, children by name.
pub async fn get_branches_under_management<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let employee = rest_state
                .employee_service()
                .get_employee_current_user(().into())
                .await?
                .ok_or(service::ServiceError::EntityNotFoundGeneric)?;
            let branches: Arc<[BranchTO]> = rest_state
                .branch_service()
                .branches_under_management(employee.branch_id, ().into())
                .await?
                .iter()
                .map(BranchTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&branches).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn create_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(branch): Json<BranchTO>,
) -> Response {
    error_handler(
        (async {
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .create(&(&branch).into(), ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&branch).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn update_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(branch_id): Path<Uuid>,
    Json(branch): Json<BranchTO>,
) -> Response {
    error_handler(
        (async {
            if branch_id != branch.id {
                return Err(RestError::InconsistentId(branch_id, branch.id));
            }
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .update(&(&branch).into(), ().into())
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&branch).unwrap()))
                .unwrap())
        })
        .await,
    )
}
