//! MarkEmailHandler - marks a received message as unrelated or unknown.

use std::sync::Arc;

use crate::domain::foundation::{InforequestId, MessageId};
use crate::domain::inforequest::EmailClassification;
use crate::ports::InforequestRepository;

use super::super::{load_inforequest, InforequestError};

#[derive(Debug, Clone)]
pub struct MarkEmailCommand {
    pub inforequest_id: InforequestId,
    pub message_id: MessageId,
    pub classification: EmailClassification,
}

pub struct MarkEmailHandler {
    repository: Arc<dyn InforequestRepository>,
}

impl MarkEmailHandler {
    pub fn new(repository: Arc<dyn InforequestRepository>) -> Self {
        Self { repository }
    }

    /// Returns the new version.
    pub async fn handle(&self, cmd: MarkEmailCommand) -> Result<u64, InforequestError> {
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        inforequest.mark_email(cmd.message_id, cmd.classification)?;
        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            message_id = %cmd.message_id,
            classification = ?cmd.classification,
            "Email marked"
        );
        Ok(version)
    }
}
