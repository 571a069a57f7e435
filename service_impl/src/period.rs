use service::period::{PeriodRequest, PeriodService, PeriodShortcut};
use tabel_utils::{monday_of_week, DateRange};
use time::macros::format_description;
use time::Date;

pub struct PeriodServiceImpl;

const REQUEST_DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

fn current_month(today: Date) -> DateRange {
    let first_day = today
        .replace_day(1)
        .expect("Every month has a first day");
    DateRange::new(first_day, today)
}

impl PeriodService for PeriodServiceImpl {
    fn resolve(&self, request: &PeriodRequest, today: Date) -> DateRange {
        match request.shortcut {
            Some(PeriodShortcut::Day) => DateRange::single_day(today),
            Some(PeriodShortcut::Week) => DateRange::new(monday_of_week(today), today),
            Some(PeriodShortcut::Month) => current_month(today),
            None => match (&request.start, &request.end) {
                (Some(start), Some(end)) => {
                    match (
                        Date::parse(start, REQUEST_DATE_FORMAT),
                        Date::parse(end, REQUEST_DATE_FORMAT),
                    ) {
                        // DateRange::new swaps a reversed pair.
                        (Ok(start), Ok(end)) => DateRange::new(start, end),
                        // Malformed dates fall back to the safe default
                        // period instead of failing the request.
                        _ => current_month(today),
                    }
                }
                _ => current_month(today),
            },
        }
    }
}
