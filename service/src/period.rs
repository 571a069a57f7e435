use std::sync::Arc;

use mockall::automock;
use tabel_utils::DateRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodShortcut {
    Day,
    Week,
    Month,
}

/// A raw, possibly ambiguous period selection as it arrives from a request.
/// Shortcuts take precedence over the explicit date strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodRequest {
    pub shortcut: Option<PeriodShortcut>,
    pub start: Option<Arc<str>>,
    pub end: Option<Arc<str>>,
}

#[automock]
pub trait PeriodService {
    /// Normalizes the request into a canonical ordered date pair.
    ///
    /// Missing or malformed explicit dates fall back to the current month
    /// (first of month through `today`); a reversed explicit pair is swapped.
    fn resolve(&self, request: &PeriodRequest, today: time::Date) -> DateRange;
}
