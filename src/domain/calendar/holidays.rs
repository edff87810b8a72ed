//! Public holiday tables.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::foundation::ValidationError;

/// Slovak public holidays that fall on the same day every year.
pub const SLOVAK_FIXED_HOLIDAYS: &[(u32, u32)] = &[
    (1, 1),
    (1, 6),
    (5, 1),
    (5, 8),
    (7, 5),
    (8, 29),
    (9, 1),
    (9, 15),
    (11, 1),
    (11, 17),
    (12, 24),
    (12, 25),
    (12, 26),
];

/// Set of non-working days besides weekends.
///
/// Three kinds of entries are supported: days repeating every year, one-off
/// dates, and the two movable days anchored on Easter Sunday (Good Friday and
/// Easter Monday).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    annual: BTreeSet<(u32, u32)>,
    dates: BTreeSet<NaiveDate>,
    easter: bool,
}

impl HolidayTable {
    /// Empty table: only weekends are non-working.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Slovak public holidays, including the Easter days.
    pub fn slovak() -> Self {
        Self {
            annual: SLOVAK_FIXED_HOLIDAYS.iter().copied().collect(),
            dates: BTreeSet::new(),
            easter: true,
        }
    }

    /// Parses entries in `MM-DD` or `YYYY-MM-DD` form.
    pub fn parse<I, S>(entries: I, easter: bool) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::empty().with_easter(easter);
        for entry in entries {
            table.add_entry(entry.as_ref())?;
        }
        Ok(table)
    }

    pub fn with_easter(mut self, easter: bool) -> Self {
        self.easter = easter;
        self
    }

    /// Adds a one-off holiday.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.dates.insert(date);
        self
    }

    /// Adds a single `MM-DD` or `YYYY-MM-DD` entry.
    pub fn add_entry(&mut self, entry: &str) -> Result<(), ValidationError> {
        let entry = entry.trim();
        match entry.len() {
            5 => {
                // Validate against a leap year so 02-29 is accepted.
                let date = NaiveDate::parse_from_str(&format!("2000-{}", entry), "%Y-%m-%d")
                    .map_err(|e| {
                        ValidationError::invalid_format("holiday", format!("{}: {}", entry, e))
                    })?;
                self.annual.insert((date.month(), date.day()));
                Ok(())
            }
            10 => {
                let date = NaiveDate::parse_from_str(entry, "%Y-%m-%d").map_err(|e| {
                    ValidationError::invalid_format("holiday", format!("{}: {}", entry, e))
                })?;
                self.dates.insert(date);
                Ok(())
            }
            _ => Err(ValidationError::invalid_format(
                "holiday",
                format!("{}: expected MM-DD or YYYY-MM-DD", entry),
            )),
        }
    }

    /// True if `date` is a holiday in this table.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if self.annual.contains(&(date.month(), date.day())) || self.dates.contains(&date) {
            return true;
        }
        if self.easter {
            if let Some(sunday) = easter_sunday(date.year()) {
                return date == sunday - Duration::days(2) || date == sunday + Duration::days(1);
            }
        }
        false
    }
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
