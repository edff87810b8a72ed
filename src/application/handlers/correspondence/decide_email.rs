//! DecideEmailHandler - records a received message as an obligee action.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, BranchId, InforequestId, MessageId, ObligeeId, Timestamp};
use crate::domain::inforequest::ActionDraft;
use crate::ports::{IdentityProvider, InforequestRepository};

use super::super::inforequest::resolve_obligees;
use super::super::{load_inforequest, InforequestError};

#[derive(Debug, Clone)]
pub struct DecideEmailCommand {
    pub inforequest_id: InforequestId,
    pub message_id: MessageId,
    pub branch_id: BranchId,
    pub draft: ActionDraft,
    /// Used only when the message is decided as an ADVANCEMENT.
    pub target_obligee_ids: Vec<ObligeeId>,
}

#[derive(Debug, Clone)]
pub struct DecideEmailResult {
    pub action_id: ActionId,
    pub version: u64,
}

pub struct DecideEmailHandler {
    repository: Arc<dyn InforequestRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl DecideEmailHandler {
    pub fn new(
        repository: Arc<dyn InforequestRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            repository,
            identity,
        }
    }

    pub async fn handle(
        &self,
        cmd: DecideEmailCommand,
    ) -> Result<DecideEmailResult, InforequestError> {
        let targets = resolve_obligees(self.identity.as_ref(), &cmd.target_obligee_ids).await?;
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        let action_type = cmd.draft.action_type;

        let action_id = inforequest.decide_email(
            cmd.message_id,
            cmd.branch_id,
            cmd.draft,
            &targets,
            Timestamp::now(),
        )?;
        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            message_id = %cmd.message_id,
            action_id = %action_id,
            action_type = %action_type,
            "Email decided"
        );
        Ok(DecideEmailResult { action_id, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::correspondence::{
        ReceiveEmailCommand, ReceiveEmailHandler,
    };
    use crate::application::handlers::fixtures::{date, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::inforequest::{ActionType, EmailClassification, Mailbox, Message, MessageDirection};

    #[tokio::test]
    async fn decided_email_becomes_linked_action() {
        let f = Fixture::new().await;
        let ir = f.submitted(date(2010, 10, 5)).await;
        let message = Message {
            id: MessageId::new(),
            direction: MessageDirection::Inbound,
            from: Mailbox::named("Vedúca odboru", "veduca@kosice.sk"),
            to: vec![Mailbox::new(ir.unique_email())],
            cc: vec![],
            bcc: vec![],
            subject: "Potvrdenie".to_string(),
            body: String::new(),
            attachments: None,
            processed_at: Timestamp::now(),
        };
        let message_id = message.id;
        ReceiveEmailHandler::new(f.repo.clone())
            .handle(ReceiveEmailCommand { message })
            .await
            .unwrap();

        let handler = DecideEmailHandler::new(f.repo.clone(), f.directory.clone());
        let cmd = DecideEmailCommand {
            inforequest_id: ir.id(),
            message_id,
            branch_id: ir.main_branch().id(),
            draft: ActionDraft::delivered(ActionType::Confirmation, date(2010, 10, 6)),
            target_obligee_ids: vec![],
        };
        let result = handler.handle(cmd.clone()).await.unwrap();

        let stored = f.load(ir.id()).await;
        let action = stored.main_branch().action(result.action_id).unwrap();
        assert_eq!(action.message(), Some(message_id));
        assert_eq!(
            stored.email(message_id).unwrap().classification,
            EmailClassification::ObligeeAction
        );
        // The sender joins the recipients of later applicant mail.
        let recipients = stored.applicant_recipients(ir.main_branch().id()).unwrap();
        assert!(recipients.iter().any(|m| m.address == "veduca@kosice.sk"));

        let again = handler.handle(cmd).await.unwrap_err();
        assert_eq!(again.code(), ErrorCode::InvalidStateTransition);
    }
}
