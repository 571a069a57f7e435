use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use service::period::{PeriodRequest, PeriodShortcut};
use service::statistics::{StatisticsService, StatusCounts};
use uuid::Uuid;

use crate::{error_handler, BranchTO, EmployeeTO, RestStateDef};

/// Period selection as it arrives on the query string. `period` carries the
/// day/week/month shortcut and wins over the explicit dates.
#[derive(Debug, PartialEq, Eq, Clone, Default, Deserialize)]
pub struct PeriodQueryTO {
    #[serde(default)]
    pub period: Option<Arc<str>>,
    #[serde(default)]
    pub start_date: Option<Arc<str>>,
    #[serde(default)]
    pub end_date: Option<Arc<str>>,
}

impl From<&PeriodQueryTO> for PeriodRequest {
    fn from(query: &PeriodQueryTO) -> Self {
        let shortcut = match query.period.as_deref() {
            Some("day") => Some(PeriodShortcut::Day),
            Some("week") => Some(PeriodShortcut::Week),
            Some("month") => Some(PeriodShortcut::Month),
            _ => None,
        };
        Self {
            shortcut,
            start: query.start_date.clone(),
            end: query.end_date.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct StatusCountsTO {
    pub full: u32,
    pub half: u32,
    pub vacation: u32,
    pub sick: u32,
}

impl From<&StatusCounts> for StatusCountsTO {
    fn from(counts: &StatusCounts) -> Self {
        Self {
            full: counts.full,
            half: counts.half,
            vacation: counts.vacation,
            sick: counts.sick,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct EmployeeStatsTO {
    pub employee: EmployeeTO,
    pub start_date: time::Date,
    pub end_date: time::Date,
    pub counts: StatusCountsTO,
    pub total_working_days: u32,
    pub missing_days: u32,
    pub attendance_percentage: f32,
}

impl From<&service::statistics::EmployeeStats> for EmployeeStatsTO {
    fn from(stats: &service::statistics::EmployeeStats) -> Self {
        Self {
            employee: EmployeeTO::from(stats.employee.as_ref()),
            start_date: stats.range.start(),
            end_date: stats.range.end(),
            counts: StatusCountsTO::from(&stats.counts),
            total_working_days: stats.total_working_days,
            missing_days: stats.missing_days,
            attendance_percentage: stats.attendance_percentage,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct BranchStatsTO {
    pub branch: BranchTO,
    pub start_date: time::Date,
    pub end_date: time::Date,
    pub employee_stats: Vec<EmployeeStatsTO>,
    pub totals: StatusCountsTO,
    pub employees_count: u32,
    pub total_working_days: u32,
    pub attendance_percentage: f32,
}

impl From<&service::statistics::BranchStats> for BranchStatsTO {
    fn from(stats: &service::statistics::BranchStats) -> Self {
        Self {
            branch: BranchTO::from(stats.branch.as_ref()),
            start_date: stats.range.start(),
            end_date: stats.range.end(),
            employee_stats: stats.employee_stats.iter().map(EmployeeStatsTO::from).collect(),
            totals: StatusCountsTO::from(&stats.totals),
            employees_count: stats.employees_count,
            total_working_days: stats.total_working_days,
            attendance_percentage: stats.attendance_percentage,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ManagementStatsTO {
    pub start_date: time::Date,
    pub end_date: time::Date,
    pub branch_stats: Vec<BranchStatsTO>,
    pub totals: StatusCountsTO,
    pub total_employees: u32,
    pub total_working_days: u32,
}

impl From<&service::statistics::ManagementStats> for ManagementStatsTO {
    fn from(stats: &service::statistics::ManagementStats) -> Self {
        Self {
            start_date: stats.range.start(),
            end_date: stats.range.end(),
            branch_stats: stats.branch_stats.iter().map(BranchStatsTO::from).collect(),
            totals: StatusCountsTO::from(&stats.totals),
            total_employees: stats.total_employees,
            total_working_days: stats.total_working_days,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/me", get(get_my_statistics::<RestState>))
        .route("/management", get(get_management_statistics::<RestState>))
        .route("/branch/{id}", get(get_branch_statistics::<RestState>))
}

pub async fn get_my_statistics<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Query(period): Query<PeriodQueryTO>,
) -> Response {
    error_handler(
        (async {
            let stats = rest_state
                .statistics_service()
                .my_stats(&PeriodRequest::from(&period), ().into())
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(
                    serde_json::to_string(&EmployeeStatsTO::from(&stats)).unwrap(),
                ))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_management_statistics<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Query(period): Query<PeriodQueryTO>,
) -> Response {
    error_handler(
        (async {
            let stats = rest_state
                .statistics_service()
                .stats_for_management(&PeriodRequest::from(&period), ().into())
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(
                    serde_json::to_string(&ManagementStatsTO::from(&stats)).unwrap(),
                ))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_branch_statistics<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(branch_id): Path<Uuid>,
    Query(period): Query<PeriodQueryTO>,
) -> Response {
    error_handler(
        (async {
            let stats = rest_state
                .statistics_service()
                .stats_for_branch(branch_id, &PeriodRequest::from(&period), ().into())
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(
                    serde_json::to_string(&BranchStatsTO::from(&stats)).unwrap(),
                ))
                .unwrap())
        })
        .await,
    )
}
