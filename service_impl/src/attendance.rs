use std::sync::Arc;

use async_trait::async_trait;
use dao::attendance::AttendanceRecordEntity;
use service::attendance::{
    AttendanceRecord, AttendanceService, AttendanceStatus, BranchDayAttendance,
    EmployeeDayAttendance,
};
use service::branch::BranchService;
use service::employee::EmployeeService;
use service::permission::Authentication;
use service::ServiceError;
use tabel_utils::DateRange;
use tracing::info;
use uuid::Uuid;

pub struct AttendanceServiceImpl<AttendanceDao, EmployeeService, BranchService, ClockService, UuidService>
where
    AttendanceDao: dao::attendance::AttendanceDao + Send + Sync,
    EmployeeService: service::employee::EmployeeService + Send + Sync,
    BranchService: service::branch::BranchService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
{
    attendance_dao: Arc<AttendanceDao>,
    employee_service: Arc<EmployeeService>,
    branch_service: Arc<BranchService>,
    clock_service: Arc<ClockService>,
    uuid_service: Arc<UuidService>,
}

const ATTENDANCE_SERVICE_PROCESS: &str = "attendance-service";

impl<AttendanceDaoImpl, EmployeeServiceImpl, BranchServiceImpl, ClockServiceImpl, UuidServiceImpl>
    AttendanceServiceImpl<
        AttendanceDaoImpl,
        EmployeeServiceImpl,
        BranchServiceImpl,
        ClockServiceImpl,
        UuidServiceImpl,
    >
where
    AttendanceDaoImpl: dao::attendance::AttendanceDao + Send + Sync,
    EmployeeServiceImpl: EmployeeService + Send + Sync,
    BranchServiceImpl: BranchService<Context = EmployeeServiceImpl::Context> + Send + Sync,
    ClockServiceImpl: service::clock::ClockService + Send + Sync,
    UuidServiceImpl: service::uuid_service::UuidService + Send + Sync,
{
    pub fn new(
        attendance_dao: Arc<AttendanceDaoImpl>,
        employee_service: Arc<EmployeeServiceImpl>,
        branch_service: Arc<BranchServiceImpl>,
        clock_service: Arc<ClockServiceImpl>,
        uuid_service: Arc<UuidServiceImpl>,
    ) -> Self {
        Self {
            attendance_dao,
            employee_service,
            branch_service,
            clock_service,
            uuid_service,
        }
    }

    /// Visibility rule shared by reads and writes: full authentication and
    /// the employee themselves always pass, leaders see every branch,
    /// managers only their own management scope.
    async fn check_record_access(
        &self,
        employee_id: Uuid,
        context: Authentication<EmployeeServiceImpl::Context>,
    ) -> Result<(), ServiceError> {
        if matches!(&context, Authentication::Full) {
            return Ok(());
        }
        let current = self
            .employee_service
            .get_employee_current_user(context)
            .await?
            .ok_or(ServiceError::EntityNotFoundGeneric)?;
        if current.id == employee_id || current.is_leader {
            return Ok(());
        }
        if current.is_manager {
            let scope = self
                .branch_service
                .branches_under_management(current.branch_id, Authentication::Full)
                .await?;
            let target = self
                .employee_service
                .get(employee_id, Authentication::Full)
                .await?;
            if let Some(branch_id) = target.branch_id {
                if scope.iter().any(|branch| branch.id == branch_id) {
                    return Ok(());
                }
            }
        }
        Err(ServiceError::Forbidden)
    }

    async fn ensure_blank_record(
        &self,
        employee_id: Uuid,
        date: time::Date,
    ) -> Result<AttendanceRecord, ServiceError> {
        if let Some(entity) = self
            .attendance_dao
            .find_by_employee_and_date(employee_id, date)
            .await?
        {
            return Ok(AttendanceRecord::from(&entity));
        }
        let now = self.clock_service.date_time_now();
        let entity = AttendanceRecordEntity {
            id: self.uuid_service.new_uuid("attendance-id"),
            employee_id,
            date,
            status: dao::attendance::AttendanceStatusEntity::Unset,
            created: now,
            updated: now,
            version: self.uuid_service.new_uuid("attendance-version"),
        };
        self.attendance_dao
            .create(&entity, ATTENDANCE_SERVICE_PROCESS)
            .await?;
        Ok(AttendanceRecord::from(&entity))
    }
}

#[async_trait]
impl<AttendanceDaoImpl, EmployeeServiceImpl, BranchServiceImpl, ClockServiceImpl, UuidServiceImpl>
    AttendanceService
    for AttendanceServiceImpl<
        AttendanceDaoImpl,
        EmployeeServiceImpl,
        BranchServiceImpl,
        ClockServiceImpl,
        UuidServiceImpl,
    >
where
    AttendanceDaoImpl: dao::attendance::AttendanceDao + Send + Sync,
    EmployeeServiceImpl: EmployeeService + Send + Sync,
    BranchServiceImpl: BranchService<Context = EmployeeServiceImpl::Context> + Send + Sync,
    ClockServiceImpl: service::clock::ClockService + Send + Sync,
    UuidServiceImpl: service::uuid_service::UuidService + Send + Sync,
{
    type Context = EmployeeServiceImpl::Context;

    async fn set_status(
        &self,
        employee_id: Uuid,
        date: time::Date,
        status: AttendanceStatus,
        context: Authentication<Self::Context>,
    ) -> Result<(AttendanceRecord, bool), ServiceError> {
        self.check_record_access(employee_id, context).await?;
        // Reject upserts for unknown employees instead of creating orphans.
        self.employee_service
            .get(employee_id, Authentication::Full)
            .await?;

        match self
            .attendance_dao
            .find_by_employee_and_date(employee_id, date)
            .await?
        {
            Some(mut entity) => {
                entity.status = (&status).into();
                entity.updated = self.clock_service.date_time_now();
                entity.version = self.uuid_service.new_uuid("attendance-version");
                self.attendance_dao
                    .update(&entity, ATTENDANCE_SERVICE_PROCESS)
                    .await?;
                info!(
                    "Updated attendance of {} on {} to '{}'",
                    employee_id,
                    date,
                    status.as_token()
                );
                Ok((AttendanceRecord::from(&entity), false))
            }
            None => {
                let now = self.clock_service.date_time_now();
                let entity = AttendanceRecordEntity {
                    id: self.uuid_service.new_uuid("attendance-id"),
                    employee_id,
                    date,
                    status: (&status).into(),
                    created: now,
                    updated: now,
                    version: self.uuid_service.new_uuid("attendance-version"),
                };
                self.attendance_dao
                    .create(&entity, ATTENDANCE_SERVICE_PROCESS)
                    .await?;
                info!(
                    "Recorded attendance of {} on {} as '{}'",
                    employee_id,
                    date,
                    status.as_token()
                );
                Ok((AttendanceRecord::from(&entity), true))
            }
        }
    }

    async fn ensure_blank(
        &self,
        employee_id: Uuid,
        date: time::Date,
        context: Authentication<Self::Context>,
    ) -> Result<AttendanceRecord, ServiceError> {
        self.check_record_access(employee_id, context).await?;
        self.employee_service
            .get(employee_id, Authentication::Full)
            .await?;
        self.ensure_blank_record(employee_id, date).await
    }

    async fn records_for_employee(
        &self,
        employee_id: Uuid,
        range: DateRange,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[AttendanceRecord]>, ServiceError> {
        self.check_record_access(employee_id, context).await?;
        Ok(self
            .attendance_dao
            .find_by_employee_and_range(employee_id, range)
            .await?
            .iter()
            .map(AttendanceRecord::from)
            .collect())
    }

    async fn records_for_employees(
        &self,
        employee_ids: &[Uuid],
        range: DateRange,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[AttendanceRecord]>, ServiceError> {
        // Set reads are used by branch-wide views: internal calls and
        // leaders pass, everyone else is denied.
        if !matches!(&context, Authentication::Full) {
            let current = self
                .employee_service
                .get_employee_current_user(context)
                .await?
                .ok_or(ServiceError::EntityNotFoundGeneric)?;
            if !current.is_leader {
                return Err(ServiceError::Forbidden);
            }
        }
        Ok(self
            .attendance_dao
            .find_by_employees_and_range(employee_ids, range)
            .await?
            .iter()
            .map(AttendanceRecord::from)
            .collect())
    }

    async fn dashboard_today(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchDayAttendance]>, ServiceError> {
        let current = self
            .employee_service
            .get_employee_current_user(context)
            .await?
            .ok_or(ServiceError::EntityNotFoundGeneric)?;
        if !current.is_manager {
            return Err(ServiceError::Forbidden);
        }
        let scope = self
            .branch_service
            .branches_under_management(current.branch_id, Authentication::Full)
            .await?;
        if scope.is_empty() {
            // Unassigned manager: deny instead of querying all employees.
            return Err(ServiceError::Forbidden);
        }

        let today = self.clock_service.date_now();
        let mut groups = Vec::with_capacity(scope.len());
        for branch in scope.iter() {
            let employees = self
                .employee_service
                .get_by_branch(branch.id, Authentication::Full)
                .await?;
            let mut entries = Vec::with_capacity(employees.len());
            for employee in employees.iter() {
                let record = self.ensure_blank_record(employee.id, today).await?;
                entries.push(EmployeeDayAttendance {
                    employee: Arc::new(employee.clone()),
                    record,
                });
            }
            groups.push(BranchDayAttendance {
                branch: Arc::new(branch.clone()),
                entries: entries.into(),
            });
        }
        Ok(groups.into())
    }
}
