use std::sync::Arc;

use mockall::automock;
use tabel_utils::DateRange;

use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NonWorkingDay {
    pub day: u8,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

/// Exact partition of a month's days into working and non-working lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: time::Month,
    pub working_days: Arc<[u8]>,
    pub non_working_days: Arc<[NonWorkingDay]>,
}

impl MonthCalendar {
    pub fn is_working_day(&self, day: u8) -> bool {
        self.working_days.contains(&day)
    }

    pub fn working_day_count(&self) -> u32 {
        self.working_days.len() as u32
    }
}

#[automock]
pub trait CalendarService {
    /// Government holidays of the year plus the movable Easter date,
    /// sorted and deduplicated.
    fn holidays_for_year(&self, year: i32) -> Arc<[time::Date]>;

    fn is_weekend(&self, date: time::Date) -> bool;
    fn is_holiday(&self, date: time::Date) -> bool;
    fn is_working_day(&self, date: time::Date) -> bool;

    fn working_days_in_month(
        &self,
        year: i32,
        month: time::Month,
    ) -> Result<MonthCalendar, ServiceError>;

    /// Number of working days within the inclusive range.
    fn working_day_count(&self, range: DateRange) -> u32;
}
