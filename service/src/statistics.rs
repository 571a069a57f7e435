use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tabel_utils::DateRange;
use uuid::Uuid;

use crate::attendance::AttendanceStatus;
use crate::branch::Branch;
use crate::employee::Employee;
use crate::period::PeriodRequest;
use crate::permission::Authentication;
use crate::ServiceError;

/// Fixed-shape per-status counters. One field per counted enumeration
/// member; `Unset` records are never counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub full: u32,
    pub half: u32,
    pub vacation: u32,
    pub sick: u32,
}

impl StatusCounts {
    /// Increments the matching counter; returns false for `Unset`.
    pub fn count(&mut self, status: AttendanceStatus) -> bool {
        match status {
            AttendanceStatus::Unset => return false,
            AttendanceStatus::Full => self.full += 1,
            AttendanceStatus::Half => self.half += 1,
            AttendanceStatus::Vacation => self.vacation += 1,
            AttendanceStatus::Sick => self.sick += 1,
        }
        true
    }

    pub fn counted(&self) -> u32 {
        self.full + self.half + self.vacation + self.sick
    }

    pub fn add(&mut self, other: &StatusCounts) {
        self.full += other.full;
        self.half += other.half;
        self.vacation += other.vacation;
        self.sick += other.sick;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeStats {
    pub employee: Arc<Employee>,
    pub range: DateRange,
    pub counts: StatusCounts,
    pub total_working_days: u32,
    pub missing_days: u32,
    pub attendance_percentage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BranchStats {
    pub branch: Arc<Branch>,
    pub range: DateRange,
    pub employee_stats: Arc<[EmployeeStats]>,
    pub totals: StatusCounts,
    pub employees_count: u32,
    pub total_working_days: u32,
    /// Pooled ratio over all employees, not an average of percentages.
    pub attendance_percentage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ManagementStats {
    pub range: DateRange,
    pub branch_stats: Arc<[BranchStats]>,
    pub totals: StatusCounts,
    pub total_employees: u32,
    pub total_working_days: u32,
}

#[automock(type Context=();)]
#[async_trait]
pub trait StatisticsService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    /// Attendance statistics of the calling user's own employee profile.
    async fn my_stats(
        &self,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeStats, ServiceError>;

    async fn stats_for_employee(
        &self,
        employee_id: Uuid,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeStats, ServiceError>;

    /// Leader view over a single branch.
    async fn stats_for_branch(
        &self,
        branch_id: Uuid,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<BranchStats, ServiceError>;

    /// Manager view over the caller's management scope, own branch first.
    async fn stats_for_management(
        &self,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<ManagementStats, ServiceError>;
}
