//! Jurisdiction-specific deadline terms.

use serde::{Deserialize, Serialize};

use crate::domain::calendar::WorkdayCalendar;
use crate::domain::deadline::DeadlineTerm;

use super::ActionType;

/// Statutory terms and the scheduler's grace periods.
///
/// Defaults are the Slovak Act No. 211/2000 terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlinePolicy {
    pub request: DeadlineTerm,
    pub clarification_response: DeadlineTerm,
    pub appeal: DeadlineTerm,
    pub clarification_request: DeadlineTerm,
    pub disclosure: DeadlineTerm,
    pub refusal: DeadlineTerm,
    pub remandment: DeadlineTerm,
    pub advanced_request: DeadlineTerm,
    pub expiration: DeadlineTerm,
    /// Workdays a remanded or advanced request spends in transit before its term starts.
    pub remand_travel_workdays: u32,
    /// Workdays behind every deadline after which an inforequest is closed.
    pub close_grace_workdays: u32,
    /// Remaining workdays at which the applicant is reminded.
    pub applicant_reminder_workdays: u32,
    /// Workdays an inbound email may stay undecided before a reminder.
    pub undecided_reminder_workdays: u32,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            request: DeadlineTerm::workdays(8),
            clarification_response: DeadlineTerm::workdays(8),
            appeal: DeadlineTerm::calendar_days(15),
            clarification_request: DeadlineTerm::calendar_days(7),
            disclosure: DeadlineTerm::calendar_days(15),
            refusal: DeadlineTerm::calendar_days(15),
            remandment: DeadlineTerm::workdays(8),
            advanced_request: DeadlineTerm::workdays(8),
            expiration: DeadlineTerm::calendar_days(15),
            remand_travel_workdays: 4,
            close_grace_workdays: 100,
            applicant_reminder_workdays: 2,
            undecided_reminder_workdays: 5,
        }
    }
}

impl DeadlinePolicy {
    /// Term of a type carrying its own deadline; `None` for the others.
    pub fn own_term(&self, action_type: ActionType) -> Option<DeadlineTerm> {
        use ActionType::*;
        match action_type {
            Request => Some(self.request),
            ClarificationResponse => Some(self.clarification_response),
            Appeal => Some(self.appeal),
            ClarificationRequest => Some(self.clarification_request),
            Disclosure => Some(self.disclosure),
            Refusal => Some(self.refusal),
            Remandment => Some(self.remandment),
            AdvancedRequest => Some(self.advanced_request),
            Expiration => Some(self.expiration),
            Confirmation | Extension | Advancement | Affirmation | Reversion
            | AppealExpiration => None,
        }
    }
}

/// Everything deadline arithmetic depends on, shared by handlers and jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Jurisdiction {
    pub calendar: WorkdayCalendar,
    pub policy: DeadlinePolicy,
}

impl Jurisdiction {
    pub fn new(calendar: WorkdayCalendar, policy: DeadlinePolicy) -> Self {
        Self { calendar, policy }
    }

    /// Slovak holidays with the default terms.
    pub fn slovak() -> Self {
        Self::new(WorkdayCalendar::slovak(), DeadlinePolicy::default())
    }
}
