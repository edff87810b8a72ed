//! Inbound and outbound messages attached to an inforequest.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AttachmentSetId, MessageId, StateMachine, Timestamp};

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    /// Addresses compare case-insensitively; display names are ignored.
    pub fn same_address(&self, other: &Mailbox) -> bool {
        self.address.eq_ignore_ascii_case(&other.address)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if !name.is_empty() => write!(f, "{} <{}>", name, self.address),
            _ => write!(f, "{}", self.address),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

/// A message as handed to or received from the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub direction: MessageDirection,
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub bcc: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    pub attachments: Option<AttachmentSetId>,
    pub processed_at: Timestamp,
}

impl Message {
    /// Every recipient across `to`, `cc` and `bcc`.
    pub fn recipients(&self) -> impl Iterator<Item = &Mailbox> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }

    pub fn is_inbound(&self) -> bool {
        self.direction == MessageDirection::Inbound
    }
}

/// What a message means for its inforequest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailClassification {
    /// Sent by the applicant as part of an action.
    ApplicantAction,
    /// Received and recorded as an obligee action.
    ObligeeAction,
    /// Received and waiting for the applicant to decide what it is.
    Undecided,
    Unrelated,
    Unknown,
}

impl StateMachine for EmailClassification {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EmailClassification::*;
        match self {
            Undecided => vec![ObligeeAction, Unrelated, Unknown],
            Unknown => vec![ObligeeAction, Unrelated],
            ApplicantAction | ObligeeAction | Unrelated => vec![],
        }
    }
}

/// A message together with its classification on one inforequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InforequestEmail {
    pub message: Message,
    pub classification: EmailClassification,
}

impl InforequestEmail {
    pub fn is_undecided(&self) -> bool {
        self.classification == EmailClassification::Undecided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_display_includes_name_when_present() {
        assert_eq!(
            Mailbox::named("Jana Nováková", "abcd@mail.example.org").to_string(),
            "Jana Nováková <abcd@mail.example.org>"
        );
        assert_eq!(Mailbox::new("info@obec.sk").to_string(), "info@obec.sk");
    }

    #[test]
    fn mailbox_address_comparison_ignores_case() {
        assert!(Mailbox::new("Info@Obec.sk").same_address(&Mailbox::named("Obec", "info@obec.sk")));
    }

    #[test]
    fn undecided_can_be_decided_once() {
        use EmailClassification::*;
        assert_eq!(Undecided.transition_to(ObligeeAction).unwrap(), ObligeeAction);
        assert!(ObligeeAction.transition_to(Unrelated).is_err());
        assert!(Unknown.can_transition_to(&ObligeeAction));
        assert!(ApplicantAction.is_terminal());
    }
}
