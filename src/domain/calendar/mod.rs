//! Calendar module - business day arithmetic over a holiday table.

mod holidays;
mod workdays;

pub use holidays::{easter_sunday, HolidayTable, SLOVAK_FIXED_HOLIDAYS};
pub use workdays::WorkdayCalendar;
