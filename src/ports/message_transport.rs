//! Message transport port - hands finished emails to the mail system.
//!
//! The core never retries a failed send. Scheduler jobs call the transport
//! only after their guard is committed and log a failure without undoing it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{AttachmentSetId, MessageId, Timestamp};
use crate::domain::inforequest::{Mailbox, Message, MessageDirection};

/// A fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    pub attachments: Option<AttachmentSetId>,
}

impl OutboundEmail {
    /// The message as it is recorded on the inforequest once handed off.
    pub fn to_message(&self, processed_at: Timestamp) -> Message {
        Message {
            id: MessageId::new(),
            direction: MessageDirection::Outbound,
            from: self.from.clone(),
            to: self.to.clone(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            attachments: self.attachments,
            processed_at,
        }
    }
}

/// Errors reported by a transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Message has no recipients")]
    NoRecipients,

    #[error("Transport rejected message: {0}")]
    Rejected(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Port for sending email.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Hand the message off for delivery.
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}
