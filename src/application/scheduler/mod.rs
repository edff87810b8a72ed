//! Scheduler - periodic reminder and auto-close jobs.
//!
//! Every job is idempotent: its guard lives on the aggregate, so running a
//! job twice at the same instant fires nothing the second time.

mod applicant_deadline_reminder;
mod close_inforequests;
mod job;
mod obligee_deadline_reminder;
pub mod reminders;
mod undecided_email_reminder;

use std::sync::Arc;

pub use applicant_deadline_reminder::ApplicantDeadlineReminder;
pub use close_inforequests::CloseInforequests;
pub use job::{JobContext, JobReport, JobServices, Recipient, ScheduledJob};
pub use obligee_deadline_reminder::ObligeeDeadlineReminder;
pub use undecided_email_reminder::UndecidedEmailReminder;

/// All jobs in the order the cron runner executes them.
pub fn standard_jobs(services: JobServices) -> Vec<Arc<dyn ScheduledJob>> {
    vec![
        Arc::new(UndecidedEmailReminder::new(services.clone())),
        Arc::new(ObligeeDeadlineReminder::new(services.clone())),
        Arc::new(ApplicantDeadlineReminder::new(services.clone())),
        Arc::new(CloseInforequests::new(services)),
    ]
}
