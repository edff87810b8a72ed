//! Tells applicants when an obligee has missed its deadline.
//!
//! Fires once per missed deadline. The guard is the reminder timestamp on the
//! branch's last action; postponing the deadline re-arms it.

use crate::domain::foundation::{BranchId, DomainError};
use crate::domain::inforequest::Inforequest;
use crate::ports::OutboundEmail;

use super::job::{JobContext, JobServices, Recipient, ScheduledJob};
use super::reminders;

pub struct ObligeeDeadlineReminder {
    services: JobServices,
}

impl ObligeeDeadlineReminder {
    pub fn new(services: JobServices) -> Self {
        Self { services }
    }

    fn due_branches(&self, inforequest: &Inforequest, ctx: &JobContext) -> Vec<BranchId> {
        if inforequest.has_undecided_email() {
            return Vec::new();
        }
        inforequest
            .branches()
            .filter(|b| b.obligee_reminder_due(&self.services.jurisdiction, ctx.today))
            .map(|b| b.id())
            .collect()
    }
}

impl ScheduledJob for ObligeeDeadlineReminder {
    fn name(&self) -> &'static str {
        "obligee_deadline_reminder"
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
        let mut emails = Vec::with_capacity(due.len());
        for branch_id in &due {
            let (Some(branch), Some(recipient)) = (inforequest.branch(*branch_id), recipient) else {
                continue;
            };
            if let Some(deadline) = branch.last_deadline(j) {
                emails.push(reminders::obligee_deadline(
                    &self.services.sender,
                    &recipient.mailbox,
                    branch,
                    &deadline,
                    ctx.today,
                ));
            }
        }
        for branch_id in due {
            inforequest.mark_deadline_reminder(branch_id, ctx.now)?;
        }
        Ok(emails)
    }
}
