//! Texts of the reminder emails sent to applicants.

use chrono::NaiveDate;

use crate::domain::deadline::Deadline;
use crate::domain::inforequest::{Branch, Inforequest, InforequestEmail, Mailbox};
use crate::ports::OutboundEmail;

fn email(sender: &Mailbox, to: &Mailbox, subject: String, body: String) -> OutboundEmail {
    OutboundEmail {
        from: sender.clone(),
        to: vec![to.clone()],
        subject,
        body,
        attachments: None,
    }
}

/// An inbound message has been waiting for a decision.
pub fn undecided_email(
    sender: &Mailbox,
    to: &Mailbox,
    inforequest: &Inforequest,
    undecided: &InforequestEmail,
) -> OutboundEmail {
    let subject = format!(
        "Your inforequest to {} has an unprocessed email",
        inforequest.main_branch().obligee().name
    );
    let body = format!(
        "On {} you received the email \"{}\" from {} at {}.\n\
         Please tell us whether it is a reply from the obligee so we can keep \
         track of your deadlines.",
        undecided.message.processed_at.local_date(),
        undecided.message.subject,
        undecided.message.from,
        inforequest.unique_email(),
    );
    email(sender, to, subject, body)
}

/// The obligee let its deadline pass.
pub fn obligee_deadline(
    sender: &Mailbox,
    to: &Mailbox,
    branch: &Branch,
    deadline: &Deadline<'_>,
    today: NaiveDate,
) -> OutboundEmail {
    let subject = format!("{} missed the deadline", branch.obligee().name);
    let body = format!(
        "The deadline of {} ({}) passed on {} and is {} workdays behind.\n\
         You may appeal or wait for the reply.",
        branch.obligee().name,
        deadline,
        deadline.snooze_date(),
        deadline.snooze_workdays_behind_at(today),
    );
    email(sender, to, subject, body)
}

/// The applicant's own deadline is about to run out.
pub fn applicant_deadline(
    sender: &Mailbox,
    to: &Mailbox,
    branch: &Branch,
    deadline: &Deadline<'_>,
    today: NaiveDate,
) -> OutboundEmail {
    let remaining = deadline.snooze_workdays_remaining_at(today);
    let subject = format!(
        "Your deadline in the inforequest to {} ends on {}",
        branch.obligee().name,
        deadline.snooze_date()
    );
    let body = if remaining < 0 {
        format!(
            "Your deadline ({}) passed on {}.",
            deadline,
            deadline.snooze_date()
        )
    } else {
        format!(
            "Your deadline ({}) ends on {}, {} workdays from today.",
            deadline,
            deadline.snooze_date(),
            remaining
        )
    };
    email(sender, to, subject, body)
}
