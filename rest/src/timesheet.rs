use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Serialize;
use service::timesheet::TimesheetService;
use service::ServiceError;
use uuid::Uuid;

use crate::{error_handler, BranchTO, EmployeeTO, RestStateDef};

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct DayCellTO {
    pub day: u8,
    /// Recorded status token of a working day, if a record exists.
    pub status: Option<Arc<str>>,
    /// Display label: the status token, or the synthesized
    /// "weekend"/"holiday" marker for non-working days.
    pub label: Arc<str>,
    pub is_working: bool,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl From<&service::timesheet::DayCell> for DayCellTO {
    fn from(cell: &service::timesheet::DayCell) -> Self {
        Self {
            day: cell.day,
            status: cell.status.map(|status| status.as_token().into()),
            label: cell.display_label().into(),
            is_working: cell.is_working,
            is_weekend: cell.is_weekend,
            is_holiday: cell.is_holiday,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct EmployeeTimesheetTO {
    pub employee: EmployeeTO,
    pub days: Vec<DayCellTO>,
    pub total_working_days: u32,
    pub filled_working_days: u32,
    pub attendance_percentage: f32,
}

impl From<&service::timesheet::EmployeeTimesheet> for EmployeeTimesheetTO {
    fn from(sheet: &service::timesheet::EmployeeTimesheet) -> Self {
        Self {
            employee: EmployeeTO::from(sheet.employee.as_ref()),
            days: sheet.days.iter().map(DayCellTO::from).collect(),
            total_working_days: sheet.total_working_days,
            filled_working_days: sheet.filled_working_days,
            attendance_percentage: sheet.attendance_percentage,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct BranchTimesheetTO {
    pub branch: BranchTO,
    pub year: i32,
    pub month: u8,
    pub days_in_month: u8,
    pub working_days: Vec<u8>,
    pub employees: Vec<EmployeeTimesheetTO>,
}

impl From<&service::timesheet::BranchTimesheet> for BranchTimesheetTO {
    fn from(sheet: &service::timesheet::BranchTimesheet) -> Self {
        Self {
            branch: BranchTO::from(sheet.branch.as_ref()),
            year: sheet.year,
            month: u8::from(sheet.month),
            days_in_month: sheet.days_in_month,
            working_days: sheet.working_days.to_vec(),
            employees: sheet.employees.iter().map(EmployeeTimesheetTO::from).collect(),
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route(
            "/management/{year}/{month}",
            get(get_management_timesheet::<RestState>),
        )
        .route(
            "/branch/{id}/year/{year}",
            get(get_branch_year_timesheets::<RestState>),
        )
        .route(
            "/branch/{id}/{year}/{month}",
            get(get_branch_timesheet::<RestState>),
        )
}

pub async fn get_management_timesheet<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((year, month)): Path<(i32, u8)>,
) -> Response {
    error_handler(
        (async {
            let month = time::Month::try_from(month).map_err(ServiceError::from)?;
            let sheets: Arc<[BranchTimesheetTO]> = rest_state
                .timesheet_service()
                .timesheet_for_management(year, month, ().into())
                .await?
                .iter()
                .map(BranchTimesheetTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&sheets).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_branch_timesheet<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((branch_id, year, month)): Path<(Uuid, i32, u8)>,
) -> Response {
    error_handler(
        (async {
            let month = time::Month::try_from(month).map_err(ServiceError::from)?;
            let sheet = rest_state
                .timesheet_service()
                .timesheet_for_branch(branch_id, year, month, ().into())
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(
                    serde_json::to_string(&BranchTimesheetTO::from(&sheet)).unwrap(),
                ))
                .unwrap())
        })
        .await,
    )
}

/// Year mode: one grid per month, January through the current month for the
/// current year and through December for a past year.
pub async fn get_branch_year_timesheets<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((branch_id, year)): Path<(Uuid, i32)>,
) -> Response {
    error_handler(
        (async {
            let sheets: Arc<[BranchTimesheetTO]> = rest_state
                .timesheet_service()
                .year_timesheets_for_branch(branch_id, year, ().into())
                .await?
                .iter()
                .map(BranchTimesheetTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&sheets).unwrap()))
                .unwrap())
        })
        .await,
    )
}
