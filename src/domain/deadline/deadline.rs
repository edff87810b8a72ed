//! Deadline value object.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::WorkdayCalendar;
use crate::domain::foundation::local_today;

/// Party that has to act before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineRole {
    Applicant,
    Obligee,
}

impl fmt::Display for DeadlineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineRole::Applicant => write!(f, "Applicant"),
            DeadlineRole::Obligee => write!(f, "Obligee"),
        }
    }
}

/// Unit a deadline term is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUnit {
    CalendarDays,
    Workdays,
}

impl DeadlineUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DeadlineUnit::CalendarDays => "CD",
            DeadlineUnit::Workdays => "WD",
        }
    }
}

/// Length of a legal term, e.g. 8 workdays or 15 calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineTerm {
    pub value: u32,
    pub unit: DeadlineUnit,
}

impl DeadlineTerm {
    pub const fn workdays(value: u32) -> Self {
        Self {
            value,
            unit: DeadlineUnit::Workdays,
        }
    }

    pub const fn calendar_days(value: u32) -> Self {
        Self {
            value,
            unit: DeadlineUnit::CalendarDays,
        }
    }

    /// Same unit, longer by `extra`.
    pub fn extended(self, extra: u32) -> Self {
        Self {
            value: self.value + extra,
            unit: self.unit,
        }
    }
}

impl fmt::Display for DeadlineTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.abbreviation())
    }
}

/// One legal obligation: who must act, from when, and for how long.
///
/// Derived from the actions of a branch; never stored. All `*_at(t)` queries
/// take the date explicitly, the argument-free variants use the local date.
/// Negative results mean "before the base date" for `passed` and "already
/// behind" for `remaining`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline<'a> {
    calendar: &'a WorkdayCalendar,
    role: DeadlineRole,
    base_date: NaiveDate,
    term: DeadlineTerm,
    snooze: Option<NaiveDate>,
}

impl<'a> Deadline<'a> {
    pub fn new(
        calendar: &'a WorkdayCalendar,
        role: DeadlineRole,
        base_date: NaiveDate,
        term: DeadlineTerm,
        snooze: Option<NaiveDate>,
    ) -> Self {
        Self {
            calendar,
            role,
            base_date,
            term,
            snooze,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn role(&self) -> DeadlineRole {
        self.role
    }

    pub fn is_applicant_deadline(&self) -> bool {
        self.role == DeadlineRole::Applicant
    }

    pub fn is_obligee_deadline(&self) -> bool {
        self.role == DeadlineRole::Obligee
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn value(&self) -> u32 {
        self.term.value
    }

    pub fn unit(&self) -> DeadlineUnit {
        self.term.unit
    }

    pub fn term(&self) -> DeadlineTerm {
        self.term
    }

    pub fn snooze(&self) -> Option<NaiveDate> {
        self.snooze
    }

    /// Same obligation with a different snooze.
    pub fn with_snooze(self, snooze: Option<NaiveDate>) -> Self {
        Self { snooze, ..self }
    }

    // ───────────────────────────────────────────────────────────────
    // Unmodified deadline
    // ───────────────────────────────────────────────────────────────

    /// Last day on which the obligation is still met.
    pub fn deadline_date(&self) -> NaiveDate {
        match self.term.unit {
            DeadlineUnit::CalendarDays => self.base_date + Duration::days(self.term.value as i64),
            DeadlineUnit::Workdays => self.calendar.advance(self.base_date, self.term.value),
        }
    }

    pub fn calendar_days_passed_at(&self, at: NaiveDate) -> i64 {
        (at - self.base_date).num_days()
    }

    pub fn workdays_passed_at(&self, at: NaiveDate) -> i64 {
        self.calendar.between(self.base_date, at)
    }

    /// Elapsed time in the deadline's own unit.
    pub fn passed_at(&self, at: NaiveDate) -> i64 {
        self.in_unit(self.calendar_days_passed_at(at), self.workdays_passed_at(at))
    }

    pub fn calendar_days_remaining_at(&self, at: NaiveDate) -> i64 {
        (self.deadline_date() - at).num_days()
    }

    pub fn workdays_remaining_at(&self, at: NaiveDate) -> i64 {
        self.calendar.between(at, self.deadline_date())
    }

    /// Remaining time in the deadline's own unit.
    pub fn remaining_at(&self, at: NaiveDate) -> i64 {
        self.in_unit(
            self.calendar_days_remaining_at(at),
            self.workdays_remaining_at(at),
        )
    }

    pub fn calendar_days_behind_at(&self, at: NaiveDate) -> i64 {
        -self.calendar_days_remaining_at(at)
    }

    pub fn workdays_behind_at(&self, at: NaiveDate) -> i64 {
        -self.workdays_remaining_at(at)
    }

    pub fn behind_at(&self, at: NaiveDate) -> i64 {
        -self.remaining_at(at)
    }

    /// Missed once the date is strictly after the deadline date.
    ///
    /// Calendar comparison even for workday terms, so a Saturday following a
    /// Friday deadline is already missed.
    pub fn is_deadline_missed_at(&self, at: NaiveDate) -> bool {
        self.calendar_days_remaining_at(at) < 0
    }

    // ───────────────────────────────────────────────────────────────
    // Snoozed deadline
    // ───────────────────────────────────────────────────────────────

    /// The deadline date postponed by the snooze, never earlier than the deadline.
    pub fn snooze_date(&self) -> NaiveDate {
        let deadline = self.deadline_date();
        match self.snooze {
            Some(snooze) if snooze > deadline => snooze,
            _ => deadline,
        }
    }

    pub fn is_snoozed(&self) -> bool {
        self.snooze_date() > self.deadline_date()
    }

    pub fn snooze_in_calendar_days(&self) -> i64 {
        (self.snooze_date() - self.deadline_date()).num_days()
    }

    pub fn snooze_in_workdays(&self) -> i64 {
        self.calendar.between(self.deadline_date(), self.snooze_date())
    }

    pub fn snooze_in(&self) -> i64 {
        self.in_unit(self.snooze_in_calendar_days(), self.snooze_in_workdays())
    }

    pub fn snooze_calendar_days_remaining_at(&self, at: NaiveDate) -> i64 {
        (self.snooze_date() - at).num_days()
    }

    pub fn snooze_workdays_remaining_at(&self, at: NaiveDate) -> i64 {
        self.calendar.between(at, self.snooze_date())
    }

    pub fn snooze_remaining_at(&self, at: NaiveDate) -> i64 {
        self.in_unit(
            self.snooze_calendar_days_remaining_at(at),
            self.snooze_workdays_remaining_at(at),
        )
    }

    pub fn snooze_calendar_days_behind_at(&self, at: NaiveDate) -> i64 {
        -self.snooze_calendar_days_remaining_at(at)
    }

    pub fn snooze_workdays_behind_at(&self, at: NaiveDate) -> i64 {
        -self.snooze_workdays_remaining_at(at)
    }

    pub fn snooze_behind_at(&self, at: NaiveDate) -> i64 {
        -self.snooze_remaining_at(at)
    }

    pub fn is_snooze_missed_at(&self, at: NaiveDate) -> bool {
        self.snooze_calendar_days_remaining_at(at) < 0
    }

    // ───────────────────────────────────────────────────────────────
    // Local-date conveniences
    // ───────────────────────────────────────────────────────────────

    pub fn calendar_days_passed(&self) -> i64 {
        self.calendar_days_passed_at(local_today())
    }

    pub fn workdays_passed(&self) -> i64 {
        self.workdays_passed_at(local_today())
    }

    pub fn passed(&self) -> i64 {
        self.passed_at(local_today())
    }

    pub fn calendar_days_remaining(&self) -> i64 {
        self.calendar_days_remaining_at(local_today())
    }

    pub fn workdays_remaining(&self) -> i64 {
        self.workdays_remaining_at(local_today())
    }

    pub fn remaining(&self) -> i64 {
        self.remaining_at(local_today())
    }

    pub fn calendar_days_behind(&self) -> i64 {
        self.calendar_days_behind_at(local_today())
    }

    pub fn workdays_behind(&self) -> i64 {
        self.workdays_behind_at(local_today())
    }

    pub fn behind(&self) -> i64 {
        self.behind_at(local_today())
    }

    pub fn is_deadline_missed(&self) -> bool {
        self.is_deadline_missed_at(local_today())
    }

    pub fn snooze_calendar_days_remaining(&self) -> i64 {
        self.snooze_calendar_days_remaining_at(local_today())
    }

    pub fn snooze_workdays_remaining(&self) -> i64 {
        self.snooze_workdays_remaining_at(local_today())
    }

    pub fn snooze_remaining(&self) -> i64 {
        self.snooze_remaining_at(local_today())
    }

    pub fn snooze_calendar_days_behind(&self) -> i64 {
        self.snooze_calendar_days_behind_at(local_today())
    }

    pub fn snooze_workdays_behind(&self) -> i64 {
        self.snooze_workdays_behind_at(local_today())
    }

    pub fn snooze_behind(&self) -> i64 {
        self.snooze_behind_at(local_today())
    }

    pub fn is_snooze_missed(&self) -> bool {
        self.is_snooze_missed_at(local_today())
    }

    fn in_unit(&self, calendar_days: i64, workdays: i64) -> i64 {
        match self.term.unit {
            DeadlineUnit::CalendarDays => calendar_days,
            DeadlineUnit::Workdays => workdays,
        }
    }
}

impl PartialEq for Deadline<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role
            && self.base_date == other.base_date
            && self.term == other.term
            && self.snooze == other.snooze
    }
}

impl Eq for Deadline<'_> {}

impl fmt::Display for Deadline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} since {}", self.term, self.role, self.base_date)?;
        if self.is_snoozed() {
            write!(f, " +{} CD", self.snooze_in_calendar_days())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obligee_wd<'a>(cal: &'a WorkdayCalendar, value: u32) -> Deadline<'a> {
        Deadline::new(
            cal,
            DeadlineRole::Obligee,
            date(2010, 10, 5),
            DeadlineTerm::workdays(value),
            None,
        )
    }

    fn applicant_cd<'a>(cal: &'a WorkdayCalendar, value: u32) -> Deadline<'a> {
        Deadline::new(
            cal,
            DeadlineRole::Applicant,
            date(2010, 10, 5),
            DeadlineTerm::calendar_days(value),
            None,
        )
    }

    #[test]
    fn deadline_date_by_unit() {
        let cal = WorkdayCalendar::default();
        assert_eq!(obligee_wd(&cal, 8).deadline_date(), date(2010, 10, 15));
        assert_eq!(applicant_cd(&cal, 8).deadline_date(), date(2010, 10, 13));
    }

    #[test]
    fn passed_counts_from_base() {
        let cal = WorkdayCalendar::default();
        let d = obligee_wd(&cal, 8);
        assert_eq!(d.calendar_days_passed_at(date(2010, 10, 10)), 5);
        assert_eq!(d.workdays_passed_at(date(2010, 10, 10)), 3);
        assert_eq!(d.passed_at(date(2010, 10, 12)), 5);
        assert_eq!(d.passed_at(date(2010, 10, 1)), -2);
    }

    #[test]
    fn remaining_and_behind_are_opposite() {
        let cal = WorkdayCalendar::default();
        let d = obligee_wd(&cal, 8);
        assert_eq!(d.workdays_remaining_at(date(2010, 10, 12)), 3);
        assert_eq!(d.calendar_days_remaining_at(date(2010, 10, 12)), 3);
        assert_eq!(d.workdays_remaining_at(date(2010, 10, 20)), -3);
        assert_eq!(d.workdays_behind_at(date(2010, 10, 20)), 3);
        assert_eq!(d.behind_at(date(2010, 10, 20)), 3);
    }

    #[test]
    fn missed_only_after_deadline_day() {
        let cal = WorkdayCalendar::default();
        let d = obligee_wd(&cal, 8);
        assert!(!d.is_deadline_missed_at(date(2010, 10, 14)));
        assert!(!d.is_deadline_missed_at(date(2010, 10, 15)));
        // Saturday after a Friday deadline.
        assert!(d.is_deadline_missed_at(date(2010, 10, 16)));
        assert_eq!(d.workdays_remaining_at(date(2010, 10, 16)), 0);
    }

    #[test]
    fn snooze_never_moves_deadline_earlier() {
        let cal = WorkdayCalendar::default();
        let early = obligee_wd(&cal, 8).with_snooze(Some(date(2010, 10, 10)));
        assert_eq!(early.snooze_date(), date(2010, 10, 15));
        assert!(!early.is_snoozed());
        assert_eq!(early.snooze_in_calendar_days(), 0);

        let late = obligee_wd(&cal, 8).with_snooze(Some(date(2010, 10, 20)));
        assert_eq!(late.snooze_date(), date(2010, 10, 20));
        assert!(late.is_snoozed());
        assert_eq!(late.snooze_in_calendar_days(), 5);
        assert_eq!(late.snooze_in_workdays(), 3);
        assert_eq!(late.snooze_in(), 3);
    }

    #[test]
    fn snooze_queries_use_snooze_date() {
        let cal = WorkdayCalendar::default();
        let d = obligee_wd(&cal, 8).with_snooze(Some(date(2010, 10, 20)));
        assert!(d.is_deadline_missed_at(date(2010, 10, 18)));
        assert!(!d.is_snooze_missed_at(date(2010, 10, 18)));
        assert_eq!(d.snooze_workdays_remaining_at(date(2010, 10, 18)), 2);
        assert_eq!(d.snooze_calendar_days_behind_at(date(2010, 10, 22)), 2);
        assert_eq!(d.snooze_behind_at(date(2010, 10, 22)), 2);
    }

    #[test]
    fn display_mentions_term_role_base_and_snooze() {
        let cal = WorkdayCalendar::default();
        let snoozed = applicant_cd(&cal, 8).with_snooze(Some(date(2010, 10, 25)));
        assert_eq!(
            snoozed.to_string(),
            "8 CD for Applicant since 2010-10-05 +12 CD"
        );
        assert_eq!(
            obligee_wd(&cal, 8).to_string(),
            "8 WD for Obligee since 2010-10-05"
        );
    }

    #[test]
    fn deadline_date_monotone_in_value() {
        let cal = WorkdayCalendar::slovak();
        for value in 0..40 {
            let wd = (obligee_wd(&cal, value), obligee_wd(&cal, value + 1));
            assert!(wd.0.deadline_date() < wd.1.deadline_date());
            let cd = (applicant_cd(&cal, value), applicant_cd(&cal, value + 1));
            assert!(cd.0.deadline_date() < cd.1.deadline_date());
        }
    }

    #[test]
    fn equality_ignores_calendar_identity() {
        let a = WorkdayCalendar::default();
        let b = WorkdayCalendar::default();
        assert_eq!(obligee_wd(&a, 8), obligee_wd(&b, 8));
        assert_ne!(obligee_wd(&a, 8), obligee_wd(&a, 9));
    }
}
