//! ReceiveEmailHandler - routes inbound mail to the inforequest it answers.

use std::sync::Arc;

use crate::domain::foundation::{InforequestId, MessageId};
use crate::domain::inforequest::Message;
use crate::ports::InforequestRepository;

use super::super::InforequestError;

#[derive(Debug, Clone)]
pub struct ReceiveEmailCommand {
    pub message: Message,
}

#[derive(Debug, Clone)]
pub struct ReceiveEmailResult {
    pub inforequest_id: InforequestId,
    pub message_id: MessageId,
    pub version: u64,
}

pub struct ReceiveEmailHandler {
    repository: Arc<dyn InforequestRepository>,
}

impl ReceiveEmailHandler {
    pub fn new(repository: Arc<dyn InforequestRepository>) -> Self {
        Self { repository }
    }

    /// Attaches the message to the first inforequest whose reply address is
    /// among its recipients. Unroutable mail is reported as unassigned.
    pub async fn handle(
        &self,
        cmd: ReceiveEmailCommand,
    ) -> Result<ReceiveEmailResult, InforequestError> {
        let message = cmd.message;
        let mut owner = None;
        for recipient in message.recipients() {
            if let Some(found) = self
                .repository
                .find_by_unique_email(&recipient.address)
                .await?
            {
                owner = Some(found);
                break;
            }
        }
        let Some(mut inforequest) = owner else {
            let addresses: Vec<&str> = message.recipients().map(|m| m.address.as_str()).collect();
            tracing::warn!(
                message_id = %message.id,
                from = %message.from,
                "Unassigned inbound email"
            );
            return Err(InforequestError::Unassigned(addresses.join(", ")));
        };

        let message_id = message.id;
        inforequest.receive_email(message)?;
        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %inforequest.id(),
            message_id = %message_id,
            "Inbound email attached as undecided"
        );
        Ok(ReceiveEmailResult {
            inforequest_id: inforequest.id(),
            message_id,
            version,
        })
    }
}
