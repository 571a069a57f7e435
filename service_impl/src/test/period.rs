use crate::period::PeriodServiceImpl;
use service::period::{PeriodRequest, PeriodService, PeriodShortcut};
use tabel_utils::DateRange;
use time::macros::date;

// 2024-03-15 is a Friday.
fn today() -> time::Date {
    date!(2024 - 03 - 15)
}

fn resolve(request: PeriodRequest) -> DateRange {
    PeriodServiceImpl.resolve(&request, today())
}

#[test]
fn test_day_shortcut() {
    let range = resolve(PeriodRequest {
        shortcut: Some(PeriodShortcut::Day),
        ..PeriodRequest::default()
    });
    assert_eq!(range, DateRange::single_day(today()));
}

#[test]
fn test_week_shortcut_is_partial_week() {
    let range = resolve(PeriodRequest {
        shortcut: Some(PeriodShortcut::Week),
        ..PeriodRequest::default()
    });
    // Monday of the current week through today, not through Sunday.
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 11), today()));
}

#[test]
fn test_month_shortcut() {
    let range = resolve(PeriodRequest {
        shortcut: Some(PeriodShortcut::Month),
        ..PeriodRequest::default()
    });
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), today()));
}

#[test]
fn test_shortcut_takes_precedence_over_explicit_dates() {
    let range = resolve(PeriodRequest {
        shortcut: Some(PeriodShortcut::Day),
        start: Some("2024-01-01".into()),
        end: Some("2024-02-01".into()),
    });
    assert_eq!(range, DateRange::single_day(today()));
}

#[test]
fn test_explicit_dates() {
    let range = resolve(PeriodRequest {
        shortcut: None,
        start: Some("2024-03-01".into()),
        end: Some("2024-03-10".into()),
    });
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 10)));
}

#[test]
fn test_swapped_explicit_dates_are_corrected() {
    let range = resolve(PeriodRequest {
        shortcut: None,
        start: Some("2024-03-10".into()),
        end: Some("2024-03-01".into()),
    });
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 10)));
}

#[test]
fn test_malformed_dates_fall_back_to_current_month() {
    let range = resolve(PeriodRequest {
        shortcut: None,
        start: Some("not-a-date".into()),
        end: Some("2024-03-10".into()),
    });
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), today()));
}

#[test]
fn test_missing_dates_fall_back_to_current_month() {
    let range = resolve(PeriodRequest::default());
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), today()));

    let range = resolve(PeriodRequest {
        shortcut: None,
        start: Some("2024-03-01".into()),
        end: None,
    });
    assert_eq!(range, DateRange::new(date!(2024 - 03 - 01), today()));
}
