use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tabel_utils::DateRange;
use uuid::Uuid;

use crate::branch::Branch;
use crate::employee::Employee;
use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Unset,
    Full,
    Half,
    Vacation,
    Sick,
}

impl AttendanceStatus {
    pub fn as_token(&self) -> &'static str {
        match self {
            AttendanceStatus::Unset => "",
            AttendanceStatus::Full => "full",
            AttendanceStatus::Half => "half",
            AttendanceStatus::Vacation => "vacation",
            AttendanceStatus::Sick => "sick",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "" => Some(AttendanceStatus::Unset),
            "full" => Some(AttendanceStatus::Full),
            "half" => Some(AttendanceStatus::Half),
            "vacation" => Some(AttendanceStatus::Vacation),
            "sick" => Some(AttendanceStatus::Sick),
            _ => None,
        }
    }
}

impl From<&dao::attendance::AttendanceStatusEntity> for AttendanceStatus {
    fn from(status: &dao::attendance::AttendanceStatusEntity) -> Self {
        match status {
            dao::attendance::AttendanceStatusEntity::Unset => Self::Unset,
            dao::attendance::AttendanceStatusEntity::Full => Self::Full,
            dao::attendance::AttendanceStatusEntity::Half => Self::Half,
            dao::attendance::AttendanceStatusEntity::Vacation => Self::Vacation,
            dao::attendance::AttendanceStatusEntity::Sick => Self::Sick,
        }
    }
}

impl From<&AttendanceStatus> for dao::attendance::AttendanceStatusEntity {
    fn from(status: &AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Unset => Self::Unset,
            AttendanceStatus::Full => Self::Full,
            AttendanceStatus::Half => Self::Half,
            AttendanceStatus::Vacation => Self::Vacation,
            AttendanceStatus::Sick => Self::Sick,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub status: AttendanceStatus,
    pub created: time::PrimitiveDateTime,
    pub updated: time::PrimitiveDateTime,
    pub version: Uuid,
}

impl From<&dao::attendance::AttendanceRecordEntity> for AttendanceRecord {
    fn from(record: &dao::attendance::AttendanceRecordEntity) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            date: record.date,
            status: AttendanceStatus::from(&record.status),
            created: record.created,
            updated: record.updated,
            version: record.version,
        }
    }
}

impl From<&AttendanceRecord> for dao::attendance::AttendanceRecordEntity {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            date: record.date,
            status: (&record.status).into(),
            created: record.created,
            updated: record.updated,
            version: record.version,
        }
    }
}

/// One employee's record for a single day, as shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeDayAttendance {
    pub employee: Arc<Employee>,
    pub record: AttendanceRecord,
}

/// Dashboard group: one branch with today's record per employee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchDayAttendance {
    pub branch: Arc<Branch>,
    pub entries: Arc<[EmployeeDayAttendance]>,
}

#[automock(type Context=();)]
#[async_trait]
pub trait AttendanceService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    /// Idempotent single-record upsert keyed by (employee, date).
    /// Returns the record and whether it was created.
    async fn set_status(
        &self,
        employee_id: Uuid,
        date: time::Date,
        status: AttendanceStatus,
        context: Authentication<Self::Context>,
    ) -> Result<(AttendanceRecord, bool), ServiceError>;

    /// Lazily creates an `Unset` record for the date on first view.
    /// An existing record is returned untouched.
    async fn ensure_blank(
        &self,
        employee_id: Uuid,
        date: time::Date,
        context: Authentication<Self::Context>,
    ) -> Result<AttendanceRecord, ServiceError>;

    async fn records_for_employee(
        &self,
        employee_id: Uuid,
        range: DateRange,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[AttendanceRecord]>, ServiceError>;

    /// One range read for a whole employee set, ordered by employee and
    /// date. Used by the branch-wide aggregation paths.
    async fn records_for_employees(
        &self,
        employee_ids: &[Uuid],
        range: DateRange,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[AttendanceRecord]>, ServiceError>;

    /// Today's dashboard for the calling manager: every employee in the
    /// management scope with a (lazily created) record for today, grouped
    /// by branch with the manager's own branch first.
    async fn dashboard_today(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Arc<[BranchDayAttendance]>, ServiceError>;
}
