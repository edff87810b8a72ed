//! Reminds applicants of inbound mail they have not classified yet.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::inforequest::Inforequest;
use crate::ports::OutboundEmail;

use super::job::{JobContext, JobServices, Recipient, ScheduledJob};
use super::reminders;

pub struct UndecidedEmailReminder {
    services: JobServices,
}

impl UndecidedEmailReminder {
    pub fn new(services: JobServices) -> Self {
        Self { services }
    }
}

impl ScheduledJob for UndecidedEmailReminder {
    fn name(&self) -> &'static str {
        "undecided_email_reminder"
    }

    fn services(&self) -> &JobServices {
        &self.services
    }

    fn is_due(&self, inforequest: &Inforequest, ctx: &JobContext) -> bool {
        inforequest.undecided_reminder_due(&self.services.jurisdiction, ctx.today)
    }

    fn apply(
        &self,
        inforequest: &mut Inforequest,
        ctx: &JobContext,
        recipient: Option<&Recipient>,
    ) -> Result<Vec<OutboundEmail>, DomainError> {
        let undecided = inforequest.newest_undecided_email().ok_or_else(|| {
            DomainError::new(ErrorCode::MessageNotFound, "No undecided email")
                .with_detail("inforequest_id", inforequest.id().to_string())
        })?;
        let emails = recipient
            .map(|r| {
                reminders::undecided_email(&self.services.sender, &r.mailbox, inforequest, undecided)
            })
            .into_iter()
            .collect();
        inforequest.mark_undecided_email_reminder(ctx.now);
        Ok(emails)
    }
}
