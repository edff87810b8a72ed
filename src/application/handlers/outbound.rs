//! Applicant mail shared by the handlers that send on the applicant's behalf.

use crate::domain::foundation::{
    ActionId, AttachmentSetId, BranchId, DomainError, InforequestId, Timestamp,
};
use crate::domain::inforequest::Inforequest;
use crate::ports::{MessageTransport, OutboundEmail};

/// Builds the email for an applicant action and records it on the inforequest.
///
/// Returns `None` when the branch has nobody to write to; the action is then
/// delivered by other means and no message is linked.
pub(crate) fn record_applicant_email(
    inforequest: &mut Inforequest,
    branch_id: BranchId,
    action_id: ActionId,
    subject: &str,
    body: &str,
    attachments: Option<AttachmentSetId>,
    now: Timestamp,
) -> Result<Option<OutboundEmail>, DomainError> {
    let to = inforequest.applicant_recipients(branch_id)?;
    if to.is_empty() {
        return Ok(None);
    }
    let email = OutboundEmail {
        from: inforequest.applicant_mailbox(),
        to,
        subject: subject.to_string(),
        body: body.to_string(),
        attachments,
    };
    inforequest.record_outbound(action_id, email.to_message(now))?;
    Ok(Some(email))
}

/// Hands committed mail to the transport. Failures are logged and not retried.
pub(crate) async fn hand_off(
    transport: &dyn MessageTransport,
    inforequest_id: InforequestId,
    email: &OutboundEmail,
) -> bool {
    match transport.send(email).await {
        Ok(()) => {
            tracing::info!(
                inforequest_id = %inforequest_id,
                recipients = email.to.len(),
                subject = %email.subject,
                "Email handed off"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                inforequest_id = %inforequest_id,
                error = %e,
                "Email hand-off failed"
            );
            false
        }
    }
}
