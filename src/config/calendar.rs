//! Calendar configuration

use serde::Deserialize;

use crate::domain::calendar::{HolidayTable, WorkdayCalendar};

use super::error::ValidationError;

/// Which built-in holiday table to start from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayPreset {
    #[default]
    Slovak,
    Empty,
}

/// Holiday calendar configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarConfig {
    /// Built-in table the extra entries are added to
    #[serde(default)]
    pub preset: HolidayPreset,

    /// Extra holidays, comma-separated `MM-DD` or `YYYY-MM-DD`
    pub holidays: Option<String>,

    /// Overrides whether Good Friday and Easter Monday are holidays
    pub easter: Option<bool>,
}

impl CalendarConfig {
    /// Extra holiday entries as a vector
    pub fn holidays_list(&self) -> Vec<String> {
        self.holidays
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build the workday calendar, rejecting malformed entries
    pub fn build(&self) -> Result<WorkdayCalendar, ValidationError> {
        let mut table = match self.preset {
            HolidayPreset::Slovak => HolidayTable::slovak(),
            HolidayPreset::Empty => HolidayTable::empty(),
        };
        if let Some(easter) = self.easter {
            table = table.with_easter(easter);
        }
        for entry in self.holidays_list() {
            table
                .add_entry(&entry)
                .map_err(|e| ValidationError::InvalidHoliday(e.to_string()))?;
        }
        Ok(WorkdayCalendar::new(table))
    }

    /// Validate calendar configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_slovak() {
        let calendar = CalendarConfig::default().build().unwrap();
        assert!(!calendar.is_workday(date(2010, 9, 1)));
        assert!(!calendar.is_workday(date(2010, 4, 5)));
    }

    #[test]
    fn test_extra_holidays_are_added() {
        let config = CalendarConfig {
            preset: HolidayPreset::Empty,
            holidays: Some("03-15, 2010-10-18".to_string()),
            easter: None,
        };
        let calendar = config.build().unwrap();
        assert!(!calendar.is_workday(date(2011, 3, 15)));
        assert!(!calendar.is_workday(date(2010, 10, 18)));
        assert!(calendar.is_workday(date(2011, 10, 18)));
    }

    #[test]
    fn test_malformed_entry_is_rejected() {
        let config = CalendarConfig {
            holidays: Some("13-45".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidHoliday(_))
        ));
    }

    #[test]
    fn test_easter_can_be_disabled() {
        let config = CalendarConfig {
            easter: Some(false),
            ..Default::default()
        };
        assert!(config.build().unwrap().is_workday(date(2010, 4, 5)));
    }
}
