use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::attendance::AttendanceStatus;
use crate::branch::Branch;
use crate::employee::Employee;
use crate::permission::Authentication;
use crate::ServiceError;

/// One calendar day of a month grid. `status` is the recorded status for
/// working days (None when no record exists). Non-working days carry the
/// weekend/holiday flags; their display label is synthesized and never a
/// stored token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub day: u8,
    pub status: Option<AttendanceStatus>,
    pub is_working: bool,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl DayCell {
    /// Weekend wins over holiday for the label; both flags stay reported.
    pub fn display_label(&self) -> &'static str {
        if self.is_working {
            self.status.map(|status| status.as_token()).unwrap_or("")
        } else if self.is_weekend {
            "weekend"
        } else {
            "holiday"
        }
    }

    /// A working day counts as filled once a non-empty status is recorded.
    pub fn is_filled(&self) -> bool {
        self.is_working && matches!(self.status, Some(status) if status != AttendanceStatus::Unset)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeTimesheet {
    pub employee: Arc<Employee>,
    pub days: Arc<[DayCell]>,
    pub total_working_days: u32,
    pub filled_working_days: u32,
    pub attendance_percentage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BranchTimesheet {
    pub branch: Arc<Branch>,
    pub year: i32,
    pub month: time::Month,
    pub days_in_month: u8,
    pub working_days: Arc<[u8]>,
    pub employees: Arc<[EmployeeTimesheet]>,
}

#[automock(type Context=();)]
#[async_trait]
pub trait TimesheetService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    async fn timesheet_for_employee(
        &self,
        employee_id: Uuid,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeTimesheet, ServiceError>;

    /// Leader view: the month grid of every employee of one branch.
    async fn timesheet_for_branch(
        &self,
        branch_id: Uuid,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<BranchTimesheet, ServiceError>;

    /// Manager view: one grid per branch under management, own branch first.
    async fn timesheet_for_management(
        &self,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchTimesheet]>, ServiceError>;

    /// Year mode: January through the current month for the current year,
    /// through December for a past year.
    async fn year_timesheets_for_branch(
        &self,
        branch_id: Uuid,
        year: i32,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchTimesheet]>, ServiceError>;
}
