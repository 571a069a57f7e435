use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use service::attendance::{AttendanceService, AttendanceStatus};
use service::branch::{Branch, BranchService};
use service::calendar::MonthCalendar;
use service::employee::{Employee, EmployeeService};
use service::permission::Authentication;
use service::timesheet::{BranchTimesheet, DayCell, EmployeeTimesheet, TimesheetService};
use service::ServiceError;
use tabel_utils::{days_in_month, DateRange};
use uuid::Uuid;

fn percentage(counted: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        counted as f32 / total as f32 * 100.0
    }
}

pub struct TimesheetServiceImpl<
    AttendanceService,
    EmployeeService,
    BranchService,
    CalendarService,
    ClockService,
> where
    AttendanceService: service::attendance::AttendanceService + Send + Sync,
    EmployeeService: service::employee::EmployeeService + Send + Sync,
    BranchService: service::branch::BranchService + Send + Sync,
    CalendarService: service::calendar::CalendarService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
{
    attendance_service: Arc<AttendanceService>,
    employee_service: Arc<EmployeeService>,
    branch_service: Arc<BranchService>,
    calendar_service: Arc<CalendarService>,
    clock_service: Arc<ClockService>,
}

impl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, ClockSvc>
    TimesheetServiceImpl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, ClockSvc>
where
    AttendanceSvc: AttendanceService<Context = EmployeeSvc::Context> + Send + Sync,
    EmployeeSvc: EmployeeService + Send + Sync,
    BranchSvc: BranchService<Context = EmployeeSvc::Context> + Send + Sync,
    CalendarSvc: service::calendar::CalendarService + Send + Sync,
    ClockSvc: service::clock::ClockService + Send + Sync,
{
    pub fn new(
        attendance_service: Arc<AttendanceSvc>,
        employee_service: Arc<EmployeeSvc>,
        branch_service: Arc<BranchSvc>,
        calendar_service: Arc<CalendarSvc>,
        clock_service: Arc<ClockSvc>,
    ) -> Self {
        Self {
            attendance_service,
            employee_service,
            branch_service,
            calendar_service,
            clock_service,
        }
    }

    /// One cell per calendar day. The non-working list of the month
    /// partition is authoritative; every other day is a working day and
    /// carries the recorded status, if any.
    async fn build_employee_timesheet(
        &self,
        employee: Arc<Employee>,
        month_calendar: &MonthCalendar,
        context: Authentication<EmployeeSvc::Context>,
    ) -> Result<EmployeeTimesheet, ServiceError> {
        let range = DateRange::month(month_calendar.year, month_calendar.month)?;
        let records = self
            .attendance_service
            .records_for_employee(employee.id, range, context)
            .await?;
        let status_by_day: HashMap<u8, AttendanceStatus> = records
            .iter()
            .map(|record| (record.date.day(), record.status))
            .collect();

        let last_day = days_in_month(month_calendar.year, month_calendar.month);
        let mut days = Vec::with_capacity(last_day as usize);
        for day in 1..=last_day {
            let cell = match month_calendar
                .non_working_days
                .iter()
                .find(|descriptor| descriptor.day == day)
            {
                Some(descriptor) => DayCell {
                    day,
                    status: None,
                    is_working: false,
                    is_weekend: descriptor.is_weekend,
                    is_holiday: descriptor.is_holiday,
                },
                None => DayCell {
                    day,
                    status: status_by_day.get(&day).copied(),
                    is_working: true,
                    is_weekend: false,
                    is_holiday: false,
                },
            };
            days.push(cell);
        }

        let total_working_days = month_calendar.working_day_count();
        let filled_working_days = days.iter().filter(|cell| cell.is_filled()).count() as u32;
        let attendance_percentage = percentage(filled_working_days, total_working_days);
        Ok(EmployeeTimesheet {
            employee,
            days: days.into(),
            total_working_days,
            filled_working_days,
            attendance_percentage,
        })
    }

    async fn branch_timesheet_internal(
        &self,
        branch: Branch,
        year: i32,
        month: time::Month,
    ) -> Result<BranchTimesheet, ServiceError> {
        let month_calendar = self.calendar_service.working_days_in_month(year, month)?;
        let employees = self
            .employee_service
            .get_by_branch(branch.id, Authentication::Full)
            .await?;
        let mut sheets = Vec::with_capacity(employees.len());
        for employee in employees.iter() {
            let sheet = self
                .build_employee_timesheet(
                    Arc::new(employee.clone()),
                    &month_calendar,
                    Authentication::Full,
                )
                .await?;
            sheets.push(sheet);
        }
        Ok(BranchTimesheet {
            branch: Arc::new(branch),
            year,
            month,
            days_in_month: days_in_month(year, month),
            working_days: month_calendar.working_days.clone(),
            employees: sheets.into(),
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
impl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, ClockSvc> TimesheetService
    for TimesheetServiceImpl<AttendanceSvc, EmployeeSvc, BranchSvc, CalendarSvc, ClockSvc>
where
    AttendanceSvc: AttendanceService<Context = EmployeeSvc::Context> + Send + Sync,
    EmployeeSvc: EmployeeService + Send + Sync,
    BranchSvc: BranchService<Context = EmployeeSvc::Context> + Send + Sync,
    CalendarSvc: service::calendar::CalendarService + Send + Sync,
    ClockSvc: service::clock::ClockService + Send + Sync,
{
    type Context = EmployeeSvc::Context;

    async fn timesheet_for_employee(
        &self,
        employee_id: Uuid,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<EmployeeTimesheet, ServiceError> {
        let employee = self
            .employee_service
            .get(employee_id, Authentication::Full)
            .await?;
        let month_calendar = self.calendar_service.working_days_in_month(year, month)?;
        // The caller's context gates record access.
        self.build_employee_timesheet(Arc::new(employee), &month_calendar, context)
            .await
    }

    async fn timesheet_for_branch(
        &self,
        branch_id: Uuid,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<BranchTimesheet, ServiceError> {
        self.require_leader(context).await?;
        let branch = self
            .branch_service
            .get(branch_id, Authentication::Full)
            .await?;
        self.branch_timesheet_internal(branch, year, month).await
    }

    async fn timesheet_for_management(
        &self,
        year: i32,
        month: time::Month,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchTimesheet]>, ServiceError> {
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
        let mut sheets = Vec::with_capacity(scope.len());
        for branch in scope.iter() {
            let sheet = self
                .branch_timesheet_internal(branch.clone(), year, month)
                .await?;
            sheets.push(sheet);
        }
        Ok(sheets.into())
    }

    async fn year_timesheets_for_branch(
        &self,
        branch_id: Uuid,
        year: i32,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchTimesheet]>, ServiceError> {
        self.require_leader(context).await?;
        let branch = self
            .branch_service
            .get(branch_id, Authentication::Full)
            .await?;

        // For the current year the report ends at the current month; future
        // months have no attendance yet.
        let today = self.clock_service.date_now();
        let last_month = if year == today.year() {
            u8::from(today.month())
        } else {
            12
        };
        let mut sheets = Vec::with_capacity(last_month as usize);
        for month_number in 1..=last_month {
            let month = time::Month::try_from(month_number)?;
            let sheet = self
                .branch_timesheet_internal(branch.clone(), year, month)
                .await?;
            sheets.push(sheet);
        }
        Ok(sheets.into())
    }
}
