//! Warns applicants whose own deadline is about to run out.
//!
//! Any earlier reminder on the action is a permanent guard.

use crate::domain::foundation::{BranchId, DomainError};
use crate::domain::inforequest::Inforequest;
use crate::ports::OutboundEmail;

use super::job::{JobContext, JobServices, Recipient, ScheduledJob};
use super::reminders;

pub struct ApplicantDeadlineReminder {
    services: JobServices,
}

impl ApplicantDeadlineReminder {
    pub fn new(services: JobServices) -> Self {
        Self { services }
    }

    fn due_branches(&self, inforequest: &Inforequest, ctx: &JobContext) -> Vec<BranchId> {
        if inforequest.has_undecided_email() {
            return Vec::new();
        }
        inforequest
            .branches()
            .filter(|b| b.applicant_reminder_due(&self.services.jurisdiction, ctx.today))
            .map(|b| b.id())
            .collect()
    }
}

impl ScheduledJob for ApplicantDeadlineReminder {
    fn name(&self) -> &'static str {
        "applicant_deadline_reminder"
    }

    fn services(&self) -> &JobServices {
        &self.services
    }

    fn is_due(&self, inforequest: &Inforequest, ctx: &JobContext) -> bool {
        !self.due_branches(inforequest, ctx).is_empty()
    }

    fn apply(
        &self,
        inforequest: &mut Inforequest,
        ctx: &JobContext,
        recipient: Option<&Recipient>,
    ) -> Result<Vec<OutboundEmail>, DomainError> {
        let j = &self.services.jurisdiction;
        let due = self.due_branches(inforequest, ctx);
        let emails = match recipient {
            Some(recipient) => due
                .iter()
                .filter_map(|id| inforequest.branch(*id))
                .filter_map(|branch| {
                    branch.last_deadline(j).map(|deadline| {
                        reminders::applicant_deadline(
                            &self.services.sender,
                            &recipient.mailbox,
                            branch,
                            &deadline,
                            ctx.today,
                        )
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        for branch_id in due {
            inforequest.mark_deadline_reminder(branch_id, ctx.now)?;
        }
        Ok(emails)
    }
}
