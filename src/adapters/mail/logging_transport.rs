//! Transport that only logs outbound mail.
//!
//! Used when no SMTP relay is configured, e.g. in development.

use async_trait::async_trait;

use crate::ports::{MessageTransport, OutboundEmail, TransportError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTransport;

impl LoggingTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageTransport for LoggingTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        if email.to.is_empty() {
            return Err(TransportError::NoRecipients);
        }
        let to: Vec<String> = email.to.iter().map(ToString::to_string).collect();
        tracing::info!(
            from = %email.from,
            to = %to.join(", "),
            subject = %email.subject,
            body_len = email.body.len(),
            "Outbound email"
        );
        Ok(())
    }
}
