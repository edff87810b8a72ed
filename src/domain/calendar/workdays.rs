//! Workday arithmetic.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::HolidayTable;

/// Counts and advances business days.
///
/// A workday is any Monday to Friday that is not in the holiday table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkdayCalendar {
    holidays: HolidayTable,
}

impl WorkdayCalendar {
    pub fn new(holidays: HolidayTable) -> Self {
        Self { holidays }
    }

    /// Calendar using the Slovak public holidays.
    pub fn slovak() -> Self {
        Self::new(HolidayTable::slovak())
    }

    pub fn holidays(&self) -> &HolidayTable {
        &self.holidays
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(date)
    }

    /// Number of workdays `d` with `a < d <= b`.
    ///
    /// Antisymmetric: when `b < a` the result is `-between(b, a)`.
    pub fn between(&self, a: NaiveDate, b: NaiveDate) -> i64 {
        if b < a {
            return -self.between(b, a);
        }
        let mut count = 0;
        let mut day = a;
        while day < b {
            day += Duration::days(1);
            if self.is_workday(day) {
                count += 1;
            }
        }
        count
    }

    /// Date reached after stepping `n` workdays forward from `date`.
    pub fn advance(&self, date: NaiveDate, n: u32) -> NaiveDate {
        let mut remaining = n;
        let mut day = date;
        while remaining > 0 {
            day += Duration::days(1);
            if self.is_workday(day) {
                remaining -= 1;
            }
        }
        day
    }
}
