pub mod date_utils;

pub use date_utils::{
    days_in_month, first_day_of_month, last_day_of_month, monday_of_week, DateRange,
    DateRangeIterator, TabelDateUtilsError,
};
