use thiserror::*;
use time::{Date, Duration, Month};

#[derive(Debug, Error)]
pub enum TabelDateUtilsError {
    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),
}

/// An inclusive, canonically ordered pair of calendar dates.
///
/// `new` swaps its arguments when they arrive in the wrong order, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(a: Date, b: Date) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single_day(day: Date) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn month(year: i32, month: Month) -> Result<Self, TabelDateUtilsError> {
        Ok(Self {
            start: first_day_of_month(year, month)?,
            end: last_day_of_month(year, month)?,
        })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter(&self) -> DateRangeIterator {
        DateRangeIterator {
            current: Some(self.start),
            end: self.end,
        }
    }
}

impl From<(Date, Date)> for DateRange {
    fn from(pair: (Date, Date)) -> Self {
        Self::new(pair.0, pair.1)
    }
}

impl IntoIterator for &DateRange {
    type Item = Date;
    type IntoIter = DateRangeIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct DateRangeIterator {
    current: Option<Date>,
    end: Date,
}

impl Iterator for DateRangeIterator {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        if current > self.end {
            self.current = None;
            return None;
        }
        self.current = current.next_day();
        Some(current)
    }
}

pub fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if time::util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

pub fn first_day_of_month(year: i32, month: Month) -> Result<Date, TabelDateUtilsError> {
    Ok(Date::from_calendar_date(year, month, 1)?)
}

pub fn last_day_of_month(year: i32, month: Month) -> Result<Date, TabelDateUtilsError> {
    Ok(Date::from_calendar_date(
        year,
        month,
        days_in_month(year, month),
    )?)
}

pub fn monday_of_week(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_date_range_orders_swapped_arguments() {
        let range = DateRange::new(date!(2024 - 03 - 10), date!(2024 - 03 - 01));
        assert_eq!(range.start(), date!(2024 - 03 - 01));
        assert_eq!(range.end(), date!(2024 - 03 - 10));
    }

    #[test]
    fn test_date_range_iteration_is_inclusive() {
        let range = DateRange::new(date!(2024 - 02 - 27), date!(2024 - 03 - 02));
        let days: Vec<Date> = range.iter().collect();
        assert_eq!(
            days,
            vec![
                date!(2024 - 02 - 27),
                date!(2024 - 02 - 28),
                date!(2024 - 02 - 29),
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 02),
            ]
        );
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::single_day(date!(2024 - 01 - 15));
        assert_eq!(range.iter().count(), 1);
        assert!(range.contains(date!(2024 - 01 - 15)));
        assert!(!range.contains(date!(2024 - 01 - 16)));
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, Month::February), 29);
        assert_eq!(days_in_month(2023, Month::February), 28);
        assert_eq!(days_in_month(2100, Month::February), 28);
        assert_eq!(days_in_month(2000, Month::February), 29);
        assert_eq!(days_in_month(2024, Month::March), 31);
        assert_eq!(days_in_month(2024, Month::April), 30);
    }

    #[test]
    fn test_month_range() {
        let range = DateRange::month(2024, Month::February).unwrap();
        assert_eq!(range.start(), date!(2024 - 02 - 01));
        assert_eq!(range.end(), date!(2024 - 02 - 29));
        assert_eq!(range.iter().count(), 29);
    }

    #[test]
    fn test_monday_of_week() {
        // 2024-03-10 is a Sunday, 2024-03-04 the Monday of that week.
        assert_eq!(monday_of_week(date!(2024 - 03 - 10)), date!(2024 - 03 - 04));
        assert_eq!(monday_of_week(date!(2024 - 03 - 04)), date!(2024 - 03 - 04));
        assert_eq!(monday_of_week(date!(2024 - 03 - 07)), date!(2024 - 03 - 04));
    }
}
