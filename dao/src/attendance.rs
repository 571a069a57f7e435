use std::sync::Arc;

use crate::DaoError;
use async_trait::async_trait;
use mockall::automock;
use tabel_utils::DateRange;
use uuid::Uuid;

/// Closed status enumeration. The tokens are persisted values and must stay
/// stable for historical records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttendanceStatusEntity {
    Unset,
    Full,
    Half,
    Vacation,
    Sick,
}

impl AttendanceStatusEntity {
    pub fn as_token(&self) -> &'static str {
        match self {
            AttendanceStatusEntity::Unset => "",
            AttendanceStatusEntity::Full => "full",
            AttendanceStatusEntity::Half => "half",
            AttendanceStatusEntity::Vacation => "vacation",
            AttendanceStatusEntity::Sick => "sick",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "" => Some(AttendanceStatusEntity::Unset),
            "full" => Some(AttendanceStatusEntity::Full),
            "half" => Some(AttendanceStatusEntity::Half),
            "vacation" => Some(AttendanceStatusEntity::Vacation),
            "sick" => Some(AttendanceStatusEntity::Sick),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceRecordEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: time::Date,
    pub status: AttendanceStatusEntity,
    pub created: time::PrimitiveDateTime,
    pub updated: time::PrimitiveDateTime,
    pub version: Uuid,
}

#[automock]
#[async_trait]
pub trait AttendanceDao {
    /// Records of one employee within the inclusive range, ordered by date.
    async fn find_by_employee_and_range(
        &self,
        employee_id: Uuid,
        range: DateRange,
    ) -> Result<Arc<[AttendanceRecordEntity]>, DaoError>;

    /// Records of a set of employees within the inclusive range, ordered by
    /// employee and date.
    async fn find_by_employees_and_range(
        &self,
        employee_ids: &[Uuid],
        range: DateRange,
    ) -> Result<Arc<[AttendanceRecordEntity]>, DaoError>;

    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: time::Date,
    ) -> Result<Option<AttendanceRecordEntity>, DaoError>;

    async fn create(&self, entity: &AttendanceRecordEntity, process: &str)
        -> Result<(), DaoError>;
    async fn update(&self, entity: &AttendanceRecordEntity, process: &str)
        -> Result<(), DaoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_are_stable() {
        assert_eq!(AttendanceStatusEntity::Unset.as_token(), "");
        assert_eq!(AttendanceStatusEntity::Full.as_token(), "full");
        assert_eq!(AttendanceStatusEntity::Half.as_token(), "half");
        assert_eq!(AttendanceStatusEntity::Vacation.as_token(), "vacation");
        assert_eq!(AttendanceStatusEntity::Sick.as_token(), "sick");
    }

    #[test]
    fn test_status_token_round_trip() {
        for status in [
            AttendanceStatusEntity::Unset,
            AttendanceStatusEntity::Full,
            AttendanceStatusEntity::Half,
            AttendanceStatusEntity::Vacation,
            AttendanceStatusEntity::Sick,
        ] {
            assert_eq!(
                AttendanceStatusEntity::from_token(status.as_token()),
                Some(status)
            );
        }
        assert_eq!(AttendanceStatusEntity::from_token("unknown"), None);
    }
}
