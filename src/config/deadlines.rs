//! Deadline terms configuration

use serde::Deserialize;

use crate::domain::deadline::DeadlineTerm;
use crate::domain::inforequest::DeadlinePolicy;

use super::error::ValidationError;

/// Statutory terms and scheduler thresholds
///
/// Every value has the unit its name carries; the defaults are those of
/// Act No. 211/2000.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeadlinesConfig {
    pub request_workdays: u32,
    pub clarification_response_workdays: u32,
    pub appeal_days: u32,
    pub clarification_request_days: u32,
    pub disclosure_days: u32,
    pub refusal_days: u32,
    pub remandment_workdays: u32,
    pub advanced_request_workdays: u32,
    pub expiration_days: u32,
    pub remand_travel_workdays: u32,
    pub close_grace_workdays: u32,
    pub applicant_reminder_workdays: u32,
    pub undecided_reminder_workdays: u32,
}

impl Default for DeadlinesConfig {
    fn default() -> Self {
        Self {
            request_workdays: 8,
            clarification_response_workdays: 8,
            appeal_days: 15,
            clarification_request_days: 7,
            disclosure_days: 15,
            refusal_days: 15,
            remandment_workdays: 8,
            advanced_request_workdays: 8,
            expiration_days: 15,
            remand_travel_workdays: 4,
            close_grace_workdays: 100,
            applicant_reminder_workdays: 2,
            undecided_reminder_workdays: 5,
        }
    }
}

impl DeadlinesConfig {
    /// The domain policy these settings describe
    pub fn to_policy(&self) -> DeadlinePolicy {
        DeadlinePolicy {
            request: DeadlineTerm::workdays(self.request_workdays),
            clarification_response: DeadlineTerm::workdays(self.clarification_response_workdays),
            appeal: DeadlineTerm::calendar_days(self.appeal_days),
            clarification_request: DeadlineTerm::calendar_days(self.clarification_request_days),
            disclosure: DeadlineTerm::calendar_days(self.disclosure_days),
            refusal: DeadlineTerm::calendar_days(self.refusal_days),
            remandment: DeadlineTerm::workdays(self.remandment_workdays),
            advanced_request: DeadlineTerm::workdays(self.advanced_request_workdays),
            expiration: DeadlineTerm::calendar_days(self.expiration_days),
            remand_travel_workdays: self.remand_travel_workdays,
            close_grace_workdays: self.close_grace_workdays,
            applicant_reminder_workdays: self.applicant_reminder_workdays,
            undecided_reminder_workdays: self.undecided_reminder_workdays,
        }
    }

    /// Validate deadline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let terms = [
            ("request_workdays", self.request_workdays),
            ("clarification_response_workdays", self.clarification_response_workdays),
            ("appeal_days", self.appeal_days),
            ("clarification_request_days", self.clarification_request_days),
            ("disclosure_days", self.disclosure_days),
            ("refusal_days", self.refusal_days),
            ("remandment_workdays", self.remandment_workdays),
            ("advanced_request_workdays", self.advanced_request_workdays),
            ("expiration_days", self.expiration_days),
            ("close_grace_workdays", self.close_grace_workdays),
        ];
        match terms.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ValidationError::InvalidTerm(*name)),
            None => Ok(()),
        }
    }
}
