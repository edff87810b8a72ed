//! Mail configuration

use serde::Deserialize;

use crate::domain::inforequest::{Mailbox, ReplyAddressTemplate};

use super::error::ValidationError;

/// Mail settings: the system sender and the per-inforequest reply addresses
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// From email address of system mail
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name of system mail
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Template of reply addresses, must contain `{token}`
    #[serde(default = "default_unique_email_template")]
    pub unique_email_template: String,
}

impl MailConfig {
    /// Sender of reminders and other system mail
    pub fn from_mailbox(&self) -> Mailbox {
        Mailbox::named(self.from_name.clone(), self.from_email.clone())
    }

    pub fn reply_address_template(&self) -> Result<ReplyAddressTemplate, ValidationError> {
        ReplyAddressTemplate::new(self.unique_email_template.clone())
            .map_err(|e| ValidationError::InvalidReplyTemplate(e.to_string()))
    }

    /// Validate mail configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        self.reply_address_template()?;
        Ok(())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            from_name: default_from_name(),
            unique_email_template: default_unique_email_template(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@inforequests.example".to_string()
}

fn default_from_name() -> String {
    "Inforequests".to_string()
}

fn default_unique_email_template() -> String {
    "{token}@mail.inforequests.example".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_config_defaults() {
        let config = MailConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.from_mailbox().to_string(),
            "Inforequests <noreply@inforequests.example>"
        );
    }

    #[test]
    fn test_template_without_token_is_rejected() {
        let config = MailConfig {
            unique_email_template: "fixed@mail.example.org".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidReplyTemplate(_))
        ));
    }

    #[test]
    fn test_invalid_from_email() {
        let config = MailConfig {
            from_email: "nobody".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }
}
