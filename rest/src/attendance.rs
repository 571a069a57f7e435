use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::attendance::{AttendanceService, AttendanceStatus};
use service::{ServiceError, ValidationFailureItem};
use uuid::Uuid;

use crate::{error_handler, BranchTO, EmployeeTO, RestError, RestStateDef};

fn parse_status(token: &str) -> Result<AttendanceStatus, RestError> {
    AttendanceStatus::from_token(token).ok_or_else(|| {
        RestError::ServiceError(ServiceError::ValidationError(
            [ValidationFailureItem::UnknownStatus(token.into())].into(),
        ))
    })
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct AttendanceRecordTO {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub status: Arc<str>,
    pub created: time::PrimitiveDateTime,
    pub updated: time::PrimitiveDateTime,
    #[serde(rename = "$version")]
    pub version: Uuid,
}

impl From<&service::attendance::AttendanceRecord> for AttendanceRecordTO {
    fn from(record: &service::attendance::AttendanceRecord) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            date: record.date,
            status: record.status.as_token().into(),
            created: record.created,
            updated: record.updated,
            version: record.version,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct SaveAttendanceTO {
    pub employee_id: Uuid,
    pub date: time::Date,
    pub status: Arc<str>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct SavedAttendanceTO {
    pub record: AttendanceRecordTO,
    pub created: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct EmployeeDayAttendanceTO {
    pub employee: EmployeeTO,
    pub record: AttendanceRecordTO,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct BranchDayAttendanceTO {
    pub branch: BranchTO,
    pub entries: Vec<EmployeeDayAttendanceTO>,
}

impl From<&service::attendance::BranchDayAttendance> for BranchDayAttendanceTO {
    fn from(group: &service::attendance::BranchDayAttendance) -> Self {
        Self {
            branch: BranchTO::from(group.branch.as_ref()),
            entries: group
                .entries
                .iter()
                .map(|entry| EmployeeDayAttendanceTO {
                    employee: EmployeeTO::from(entry.employee.as_ref()),
                    record: AttendanceRecordTO::from(&entry.record),
                })
                .collect(),
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", post(save_attendance::<RestState>))
        .route("/today", get(dashboard_today::<RestState>))
}

/// Idempotent (employee, date) upsert. Unknown status tokens are rejected
/// with a validation failure.
pub async fn save_attendance<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(save): Json<SaveAttendanceTO>,
) -> Response {
    error_handler(
        (async {
            let status = parse_status(&save.status)?;
            let (record, created) = rest_state
                .attendance_service()
                .set_status(save.employee_id, save.date, status, ().into())
                .await?;
            let saved = SavedAttendanceTO {
                record: AttendanceRecordTO::from(&record),
                created,
            };
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&saved).unwrap()))
                .unwrap())
        })
        .await,
    )
}

/// Manager dashboard: today's record for every employee in scope, lazily
/// created with an empty status on first view.
pub async fn dashboard_today<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let dashboard: Arc<[BranchDayAttendanceTO]> = rest_state
                .attendance_service()
                .dashboard_today(().into())
                .await?
                .iter()
                .map(BranchDayAttendanceTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&dashboard).unwrap()))
                .unwrap())
        })
        .await,
    )
}
