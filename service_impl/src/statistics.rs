use std::sync::Arc;

use async_trait::async_trait;
use service::attendance::AttendanceService;
use service::branch::{Branch, BranchService};
use service::employee::{Employee, EmployeeService};
use service::period::PeriodRequest;
use service::permission::Authentication;
use service::statistics::{
    BranchStats, EmployeeStats, ManagementStats, StatisticsService, StatusCounts,
};
use service::ServiceError;
use tabel_utils::DateRange;
use uuid::Uuid;

fn percentage(counted: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        counted as f32 / total as f32 * 100.0
    }
}

pub struct StatisticsServiceImpl<
    AttendanceService,
    EmployeeService,
    BranchService,
    CalendarService,
    PeriodService,
    ClockService,
> where
    AttendanceService: service::attendance::AttendanceService + Send + Sync,
    EmployeeService: service::employee::EmployeeService + Send + Sync,
    BranchService: service::branch::BranchService + Send + Sync,
    CalendarService: service::calendar::CalendarService + Send + Sync,
    PeriodService: service::period::PeriodService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
{
    attendance_service: Arc<AttendanceService>,
    employee_service: Arc<EmployeeService>,
    branch_service: Arc<BranchService>,
    calendar_service: Arc<CalendarService>,
    period_service: Arc<PeriodService>,
    clock_service: Arc<ClockService>,
}

impl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, PeriodSvc, ClockSvc>
    StatisticsServiceImpl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, PeriodSvc, ClockSvc>
where
    AttendanceSvc: AttendanceService<Context = EmployeeSvc::Context> + Send + Sync,
    EmployeeSvc: EmployeeService + Send + Sync,
    BranchSvc: BranchService<Context = EmployeeSvc::Context> + Send + Sync,
    CalendarSvc: service::calendar::CalendarService + Send + Sync,
    PeriodSvc: service::period::PeriodService + Send + Sync,
    ClockSvc: service::clock::ClockService + Send + Sync,
{
    pub fn new(
        attendance_service: Arc<AttendanceSvc>,
        employee_service: Arc<EmployeeSvc>,
        branch_service: Arc<BranchSvc>,
        calendar_service: Arc<CalendarSvc>,
        period_service: Arc<PeriodSvc>,
        clock_service: Arc<ClockSvc>,
    ) -> Self {
        Self {
            attendance_service,
            employee_service,
            branch_service,
            calendar_service,
            period_service,
            clock_service,
        }
    }

    fn resolve(&self, period: &PeriodRequest) -> DateRange {
        self.period_service
            .resolve(period, self.clock_service.date_now())
    }

    /// The aggregation core: only records that fall on working days are
    /// counted. The ledger may hold records on weekends or holidays; they
    /// are read but never counted.
    fn stats_from_records(
        &self,
        employee: Arc<Employee>,
        range: DateRange,
        records: &[service::attendance::AttendanceRecord],
    ) -> EmployeeStats {
        let mut counts = StatusCounts::default();
        for record in records {
            if self.calendar_service.is_working_day(record.date) {
                counts.count(record.status);
            }
        }
        let total_working_days = self.calendar_service.working_day_count(range);
        let missing_days = total_working_days.saturating_sub(counts.counted());
        let attendance_percentage = percentage(counts.counted(), total_working_days);
        EmployeeStats {
            employee,
            range,
            counts,
            total_working_days,
            missing_days,
            attendance_percentage,
        }
    }

    async fn aggregate_employee(
        &self,
        employee: Arc<Employee>,
        range: DateRange,
        context: Authentication<EmployeeSvc::Context>,
    ) -> Result<EmployeeStats, ServiceError> {
        let records = self
            .attendance_service
            .records_for_employee(employee.id, range, context)
            .await?;
        Ok(self.stats_from_records(employee, range, &records))
    }

    async fn branch_stats_internal(
        &self,
        branch: Branch,
        range: DateRange,
    ) -> Result<BranchStats, ServiceError> {
        let branch = Arc::new(branch);
        let employees = self
            .employee_service
            .get_by_branch(branch.id, Authentication::Full)
            .await?;
        let total_working_days = self.calendar_service.working_day_count(range);

        // One ledger range read for the whole branch instead of one query
        // per employee.
        let employee_ids: Vec<Uuid> = employees.iter().map(|employee| employee.id).collect();
        let records = self
            .attendance_service
            .records_for_employees(&employee_ids, range, Authentication::Full)
            .await?;

        let mut employee_stats = Vec::with_capacity(employees.len());
        let mut totals = StatusCounts::default();
        let mut counted_sum = 0u32;
        let mut possible_sum = 0u32;
        for employee in employees.iter() {
            let employee_records: Vec<service::attendance::AttendanceRecord> = records
                .iter()
                .filter(|record| record.employee_id == employee.id)
                .cloned()
                .collect();
            let stats =
                self.stats_from_records(Arc::new(employee.clone()), range, &employee_records);
            totals.add(&stats.counts);
            counted_sum += stats.counts.counted();
            possible_sum += stats.total_working_days;
            employee_stats.push(stats);
        }

        // Pooled ratio over all employees, not an average of percentages.
        let attendance_percentage = percentage(counted_sum, possible_sum);
        Ok(BranchStats {
            branch,
            range,
            employee_stats: employee_stats.into(),
            totals,
            employees_count: employees.len() as u32,
            total_working_days,
            attendance_percentage,
        })
    }

    async fn current_employee(
        &self,
        context: Authentication<EmployeeSvc::Context>,
    ) -> Result<Employee, ServiceError> {
        self.employee_service
            .get_employee_current_user(context)
            .await?
            .ok_or(ServiceError::EntityNotFoundGeneric)
    }

    async fn require_leader(
        &self,
        context: Authentication<EmployeeSvc::Context>,
    ) -> Result<(), ServiceError> {
        if matches!(&context, Authentication::Full) {
            return Ok(());
        }
        let current = self.current_employee(context).await?;
        if current.is_leader {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

#[async_trait]
impl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, PeriodSvc, ClockSvc> StatisticsService
    for StatisticsServiceImpl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, PeriodSvc, ClockSvc>
where
    AttendanceSvc: AttendanceService<Context = EmployeeSvc::Context> + Send + Sync,
    EmployeeSvc: EmployeeService + Send + Sync,
    BranchSvc: BranchService<Context = EmployeeSvc::Context> + Send + Sync,
    CalendarSvc: service::calendar::CalendarService + Send + Sync,
    PeriodSvc: service::period::PeriodService + Send + Sync,
    ClockSvc: service::clock::ClockService + Send + Sync,
{
    type Context = EmployeeSvc::Context;

    async fn my_stats(
        &self,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeStats, ServiceError> {
        let current = self.current_employee(context).await?;
        let range = self.resolve(period);
        self.aggregate_employee(Arc::new(current), range, Authentication::Full)
            .await
    }

    async fn stats_for_employee(
        &self,
        employee_id: Uuid,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeStats, ServiceError> {
        let employee = self
            .employee_service
            .get(employee_id, Authentication::Full)
            .await?;
        let range = self.resolve(period);
        // The caller's context gates record access (self, leader, or the
        // employee's branch within the caller's management scope).
        self.aggregate_employee(Arc::new(employee), range, context)
            .await
    }

    async fn stats_for_branch(
        &self,
        branch_id: Uuid,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<BranchStats, ServiceError> {
        self.require_leader(context).await?;
        let branch = self
            .branch_service
            .get(branch_id, Authentication::Full)
            .await?;
        let range = self.resolve(period);
        self.branch_stats_internal(branch, range).await
    }

    async fn stats_for_management(
        &self,
        period: &PeriodRequest,
        context: Authentication<Self::Context>,
    ) -> Result<ManagementStats, ServiceError> {
        let current = self.current_employee(context).await?;
        if !current.is_manager {
            return Err(ServiceError::Forbidden);
        }
        let scope = self
            .branch_service
            .branches_under_management(current.branch_id, Authentication::Full)
            .await?;
        if scope.is_empty() {
            return Err(ServiceError::Forbidden);
        }

        let range = self.resolve(period);
        let mut branch_stats = Vec::with_capacity(scope.len());
        let mut totals = StatusCounts::default();
        let mut total_employees = 0;
        for branch in scope.iter() {
            let stats = self.branch_stats_internal(branch.clone(), range).await?;
            totals.add(&stats.totals);
            total_employees += stats.employees_count;
            branch_stats.push(stats);
        }
        let total_working_days = self.calendar_service.working_day_count(range);
        Ok(ManagementStats {
            range,
            branch_stats: branch_stats.into(),
            totals,
            total_employees,
            total_working_days,
        })
    }
}
