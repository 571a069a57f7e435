use crate::calendar::{easter_date, CalendarServiceImpl};
use proptest::prelude::*;
use service::calendar::CalendarService;
use tabel_utils::{days_in_month, DateRange};
use time::macros::date;
use time::{Month, Weekday};

#[test]
fn test_holidays_for_2024() {
    let calendar = CalendarServiceImpl;
    let holidays = calendar.holidays_for_year(2024);

    let expected = [
        date!(2024 - 01 - 01),
        date!(2024 - 01 - 02),
        date!(2024 - 01 - 03),
        date!(2024 - 01 - 04),
        date!(2024 - 01 - 05),
        date!(2024 - 01 - 06),
        date!(2024 - 01 - 07),
        date!(2024 - 01 - 08),
        date!(2024 - 02 - 23),
        date!(2024 - 03 - 08),
        date!(2024 - 03 - 31), // Easter
        date!(2024 - 05 - 01),
        date!(2024 - 05 - 09),
        date!(2024 - 06 - 12),
        date!(2024 - 11 - 04),
    ];
    assert_eq!(holidays.as_ref(), &expected[..]);
}

#[test]
fn test_holidays_sorted_and_deduplicated() {
    let calendar = CalendarServiceImpl;
    for year in [2020, 2024, 2025, 2030] {
        let holidays = calendar.holidays_for_year(year);
        for pair in holidays.windows(2) {
            assert!(pair[0] < pair[1], "Holidays of {} not strictly sorted", year);
        }
    }
}

#[test]
fn test_easter_known_dates() {
    assert_eq!(easter_date(2023), date!(2023 - 04 - 09));
    assert_eq!(easter_date(2024), date!(2024 - 03 - 31));
    assert_eq!(easter_date(2025), date!(2025 - 04 - 20));
    assert_eq!(easter_date(2016), date!(2016 - 03 - 27));
}

#[test]
fn test_easter_is_always_a_sunday() {
    for year in 1990..=2100 {
        assert_eq!(
            easter_date(year).weekday(),
            Weekday::Sunday,
            "Easter of {} is not a Sunday",
            year
        );
    }
}

#[test]
fn test_is_working_day_consistency() {
    let calendar = CalendarServiceImpl;
    for date in DateRange::new(date!(2024 - 01 - 01), date!(2024 - 12 - 31)).iter() {
        assert_eq!(
            calendar.is_working_day(date),
            !(calendar.is_weekend(date) || calendar.is_holiday(date)),
            "Inconsistent classification for {}",
            date
        );
    }
}

#[test]
fn test_march_2024_partition() {
    let calendar = CalendarServiceImpl;
    let partition = calendar.working_days_in_month(2024, Month::March).unwrap();

    assert_eq!(partition.working_day_count(), 20);
    assert_eq!(partition.non_working_days.len(), 11);
    assert!(!partition.is_working_day(8), "March 8th is a holiday");
    assert!(!partition.is_working_day(2), "March 2nd is a Saturday");
    assert!(partition.is_working_day(4));

    let women_day = partition
        .non_working_days
        .iter()
        .find(|descriptor| descriptor.day == 8)
        .unwrap();
    assert!(women_day.is_holiday);
    assert!(!women_day.is_weekend);

    // Easter 2024 falls on Sunday March 31st: both flags reported.
    let easter = partition
        .non_working_days
        .iter()
        .find(|descriptor| descriptor.day == 31)
        .unwrap();
    assert!(easter.is_weekend);
    assert!(easter.is_holiday);
}

#[test]
fn test_working_day_count_over_year_boundary() {
    let calendar = CalendarServiceImpl;
    // Dec 30-31 are regular working days, Jan 1-8 the New Year break,
    // Jan 9th 2025 a Thursday.
    let range = DateRange::new(date!(2024 - 12 - 30), date!(2025 - 01 - 09));
    assert_eq!(calendar.working_day_count(range), 3);
}

#[test]
fn test_working_day_count_first_march_week() {
    let calendar = CalendarServiceImpl;
    let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 10));
    // Fri 1st plus Mon-Thu 4th-7th; the 8th is a holiday.
    assert_eq!(calendar.working_day_count(range), 5);
}

proptest! {
    #[test]
    fn test_month_partition_is_exact(year in 2000i32..2100, month_number in 1u8..=12) {
        let calendar = CalendarServiceImpl;
        let month = Month::try_from(month_number).unwrap();
        let partition = calendar.working_days_in_month(year, month).unwrap();

        let total = days_in_month(year, month) as usize;
        prop_assert_eq!(
            partition.working_days.len() + partition.non_working_days.len(),
            total
        );

        let mut seen = vec![false; total + 1];
        for day in partition.working_days.iter() {
            prop_assert!(!seen[*day as usize], "Day {} listed twice", day);
            seen[*day as usize] = true;
        }
        for descriptor in partition.non_working_days.iter() {
            prop_assert!(!seen[descriptor.day as usize], "Day {} listed twice", descriptor.day);
            seen[descriptor.day as usize] = true;
            prop_assert!(descriptor.is_weekend || descriptor.is_holiday);
        }
        prop_assert!(seen[1..].iter().all(|covered| *covered));
    }
}
