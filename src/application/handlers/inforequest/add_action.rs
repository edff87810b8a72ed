//! AddActionHandler - records an applicant or obligee action on a branch.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, BranchId, InforequestId, Timestamp};
use crate::domain::inforequest::ActionDraft;
use crate::ports::{InforequestRepository, MessageTransport};

use super::super::outbound::{hand_off, record_applicant_email};
use super::super::{load_inforequest, InforequestError};

/// Command to record an action.
#[derive(Debug, Clone)]
pub struct AddActionCommand {
    pub inforequest_id: InforequestId,
    pub branch_id: BranchId,
    pub draft: ActionDraft,
    /// Email an applicant action to the branch's correspondents.
    pub send_email: bool,
}

#[derive(Debug, Clone)]
pub struct AddActionResult {
    pub action_id: ActionId,
    pub version: u64,
    pub email_sent: bool,
}

pub struct AddActionHandler {
    repository: Arc<dyn InforequestRepository>,
    transport: Arc<dyn MessageTransport>,
}

impl AddActionHandler {
    pub fn new(
        repository: Arc<dyn InforequestRepository>,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        Self {
            repository,
            transport,
        }
    }

    pub async fn handle(&self, cmd: AddActionCommand) -> Result<AddActionResult, InforequestError> {
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        let now = Timestamp::now();
        let action_type = cmd.draft.action_type;
        let subject = cmd.draft.subject.clone();
        let content = cmd.draft.content.clone();
        let attachments = cmd.draft.attachments;

        let action_id = inforequest.add_action(cmd.branch_id, cmd.draft, now)?;
        let email = if cmd.send_email && action_type.is_applicant_action() {
            record_applicant_email(
                &mut inforequest,
                cmd.branch_id,
                action_id,
                &subject,
                &content,
                attachments,
                now,
            )?
        } else {
            None
        };

        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            branch_id = %cmd.branch_id,
            action_id = %action_id,
            action_type = %action_type,
            "Action recorded"
        );

        let email_sent = match &email {
            Some(email) => hand_off(self.transport.as_ref(), cmd.inforequest_id, email).await,
            None => false,
        };
        Ok(AddActionResult {
            action_id,
            version,
            email_sent,
        })
    }
}
