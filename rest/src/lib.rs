use std::sync::Arc;

mod attendance;
mod branch;
mod employee;
mod statistics;
mod timesheet;

use axum::{body::Body, response::Response, Router};
use thiserror::Error;
use uuid::Uuid;

pub use branch::BranchTO;
pub use employee::EmployeeTO;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] service::ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::InconsistentId(_, _)) => Response::builder()
            .status(400)
            .body(Body::new(err.to_string()))
            .unwrap(),
        Err(RestError::ServiceError(service::ServiceError::Forbidden)) => {
            Response::builder().status(403).body(Body::empty()).unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::EntityNotFound(id))) => {
            Response::builder()
                .status(404)
                .body(Body::new(id.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::EntityNotFoundGeneric)) => {
            Response::builder().status(404).body(Body::empty()).unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::DatabaseQueryError(err))) => {
            tracing::error!("Database query error: {}", err);
            Response::builder()
                .status(500)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::EntityAlreadyExists(_))) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::EntityConflicts(_, _, _))) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::ValidationError(_))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::IdSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::VersionSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::DateError(_))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::DateUtilsError(_))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type BranchService: service::branch::BranchService<Context = ()> + Send + Sync + 'static;
    type EmployeeService: service::employee::EmployeeService<Context = ()> + Send + Sync + 'static;
    type AttendanceService: service::attendance::AttendanceService<Context = ()>
        + Send
        + Sync
        + 'static;
    type StatisticsService: service::statistics::StatisticsService<Context = ()>
        + Send
        + Sync
        + 'static;
    type TimesheetService: service::timesheet::TimesheetService<Context = ()>
        + Send
        + Sync
        + 'static;

    fn branch_service(&self) -> Arc<Self::BranchService>;
    fn employee_service(&self) -> Arc<Self::EmployeeService>;
    fn attendance_service(&self) -> Arc<Self::AttendanceService>;
    fn statistics_service(&self) -> Arc<Self::StatisticsService>;
    fn timesheet_service(&self) -> Arc<Self::TimesheetService>;
}

pub async fn start_server<RestState: RestStateDef>(rest_state: RestState) {
    let app = Router::new()
        .nest("/branch", branch::generate_route())
        .nest("/employee", employee::generate_route())
        .nest("/attendance", attendance::generate_route())
        .nest("/statistics", statistics::generate_route())
        .nest("/timesheet", timesheet::generate_route())
        .with_state(rest_state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .expect("Could not bind server");
    tracing::info!("Listening on 127.0.0.1:3000");
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}
