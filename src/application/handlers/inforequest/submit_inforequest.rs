//! SubmitInforequestHandler - files a new inforequest and sends the request.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{
    ApplicantId, AttachmentSetId, DomainError, ErrorCode, ObligeeId, Timestamp,
};
use crate::domain::inforequest::reply_address::{candidate_lengths, random_readable};
use crate::domain::inforequest::{ActionDraft, ActionType, Inforequest, ReplyAddressTemplate};
use crate::ports::{IdentityProvider, InforequestRepository, MessageTransport};

use super::super::outbound::{hand_off, record_applicant_email};
use super::super::InforequestError;

/// Command to submit a new inforequest.
#[derive(Debug, Clone)]
pub struct SubmitInforequestCommand {
    pub applicant_id: ApplicantId,
    pub obligee_id: ObligeeId,
    pub subject: String,
    pub content: String,
    pub attachments: Option<AttachmentSetId>,
    pub submitted_on: NaiveDate,
}

/// Result of a submission.
#[derive(Debug, Clone)]
pub struct SubmitInforequestResult {
    pub inforequest: Inforequest,
    /// False when the obligee has no address or the transport failed.
    pub email_sent: bool,
}

/// Handler for submitting inforequests.
pub struct SubmitInforequestHandler {
    repository: Arc<dyn InforequestRepository>,
    identity: Arc<dyn IdentityProvider>,
    transport: Arc<dyn MessageTransport>,
    reply_address: ReplyAddressTemplate,
}

impl SubmitInforequestHandler {
    pub fn new(
        repository: Arc<dyn InforequestRepository>,
        identity: Arc<dyn IdentityProvider>,
        transport: Arc<dyn MessageTransport>,
        reply_address: ReplyAddressTemplate,
    ) -> Self {
        Self {
            repository,
            identity,
            transport,
            reply_address,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitInforequestCommand,
    ) -> Result<SubmitInforequestResult, InforequestError> {
        let applicant = self
            .identity
            .applicant(&cmd.applicant_id)
            .await?
            .ok_or(InforequestError::ApplicantNotFound(cmd.applicant_id))?;
        let obligee = self
            .identity
            .obligee(&cmd.obligee_id)
            .await?
            .ok_or(InforequestError::ObligeeNotFound(cmd.obligee_id))?;

        let unique_email = self.free_reply_address().await?;
        let now = Timestamp::now();
        let mut draft = ActionDraft::delivered(ActionType::Request, cmd.submitted_on)
            .with_text(cmd.subject.clone(), cmd.content.clone());
        if let Some(attachments) = cmd.attachments {
            draft = draft.with_attachments(attachments);
        }
        let mut inforequest = Inforequest::submit(&applicant, &obligee, unique_email, draft, now)?;

        let main = inforequest.main_branch();
        let branch_id = main.id();
        let request_id = main.last_action().map(|a| a.id()).ok_or_else(|| {
            DomainError::new(ErrorCode::BranchTreeCorrupted, "Submitted without a request")
        })?;
        let email = record_applicant_email(
            &mut inforequest,
            branch_id,
            request_id,
            &cmd.subject,
            &cmd.content,
            cmd.attachments,
            now,
        )?;

        self.repository.save(&inforequest).await?;
        tracing::info!(
            inforequest_id = %inforequest.id(),
            obligee_id = %obligee.id,
            unique_email = %inforequest.unique_email(),
            "Inforequest submitted"
        );

        let email_sent = match &email {
            Some(email) => hand_off(self.transport.as_ref(), inforequest.id(), email).await,
            None => false,
        };
        Ok(SubmitInforequestResult {
            inforequest,
            email_sent,
        })
    }

    /// Draws tokens of growing length until one renders to an unused address.
    async fn free_reply_address(&self) -> Result<String, InforequestError> {
        let mut attempts = 0;
        for length in candidate_lengths() {
            attempts += 1;
            let candidate = {
                let mut rng = rand::thread_rng();
                self.reply_address.render(&random_readable(&mut rng, length))
            };
            if self
                .repository
                .find_by_unique_email(&candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "Reply address taken");
        }
        Err(InforequestError::ReplyAddressExhausted(attempts))
    }
}
