use std::sync::Arc;

use service::calendar::{CalendarService, MonthCalendar, NonWorkingDay};
use service::ServiceError;
use tabel_utils::{days_in_month, DateRange};
use time::{Date, Month, Weekday};

/// Russian production calendar: fixed government holidays plus the movable
/// Easter date.
pub struct CalendarServiceImpl;

// (month, day) pairs of the fixed holidays. The New Year break Jan 1-8
// already covers Christmas on Jan 7.
const FIXED_HOLIDAYS: [(Month, u8); 14] = [
    (Month::January, 1),
    (Month::January, 2),
    (Month::January, 3),
    (Month::January, 4),
    (Month::January, 5),
    (Month::January, 6),
    (Month::January, 7),
    (Month::January, 8),
    (Month::February, 23),
    (Month::March, 8),
    (Month::May, 1),
    (Month::May, 9),
    (Month::June, 12),
    (Month::November, 4),
];

/// Gregorian Easter by the Meeus/Jones/Butcher algorithm. Deterministic per
/// year and always a Sunday.
pub fn easter_date(year: i32) -> Date {
    let a = year.rem_euclid(19);
    let b = year / 100;
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b.rem_euclid(4);
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;
    let month = Month::try_from(month as u8).expect("Easter month is always March or April");
    Date::from_calendar_date(year, month, day as u8).expect("Easter day is a valid calendar day")
}

impl CalendarServiceImpl {
    fn holidays(year: i32) -> Vec<Date> {
        let mut holidays: Vec<Date> = FIXED_HOLIDAYS
            .iter()
            .map(|(month, day)| {
                Date::from_calendar_date(year, *month, *day)
                    .expect("Fixed holidays are valid calendar days in every year")
            })
            .collect();
        holidays.push(easter_date(year));
        holidays.sort();
        holidays.dedup();
        holidays
    }
}

impl CalendarService for CalendarServiceImpl {
    fn holidays_for_year(&self, year: i32) -> Arc<[Date]> {
        Self::holidays(year).into()
    }

    fn is_weekend(&self, date: Date) -> bool {
        matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    fn is_holiday(&self, date: Date) -> bool {
        Self::holidays(date.year()).contains(&date)
    }

    fn is_working_day(&self, date: Date) -> bool {
        !(self.is_weekend(date) || self.is_holiday(date))
    }

    fn working_days_in_month(&self, year: i32, month: Month) -> Result<MonthCalendar, ServiceError> {
        let holidays = Self::holidays(year);
        let mut working_days = Vec::new();
        let mut non_working_days = Vec::new();
        for day in 1..=days_in_month(year, month) {
            let date = Date::from_calendar_date(year, month, day)?;
            let is_weekend = self.is_weekend(date);
            let is_holiday = holidays.contains(&date);
            if is_weekend || is_holiday {
                non_working_days.push(NonWorkingDay {
                    day,
                    is_weekend,
                    is_holiday,
                });
            } else {
                working_days.push(day);
            }
        }
        Ok(MonthCalendar {
            year,
            month,
            working_days: working_days.into(),
            non_working_days: non_working_days.into(),
        })
    }

    fn working_day_count(&self, range: DateRange) -> u32 {
        // Cache the holiday list per year instead of rebuilding it for
        // every day of the range.
        let mut cached_year = i32::MIN;
        let mut holidays: Vec<Date> = Vec::new();
        let mut count = 0;
        for date in range.iter() {
            if self.is_weekend(date) {
                continue;
            }
            if date.year() != cached_year {
                cached_year = date.year();
                holidays = Self::holidays(cached_year);
            }
            if !holidays.contains(&date) {
                count += 1;
            }
        }
        count
    }
}
