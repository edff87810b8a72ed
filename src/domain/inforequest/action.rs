//! Action entity - one recorded legal event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActionId, AttachmentSetId, DomainError, ErrorCode, MessageId, Timestamp,
};

use super::{ActionType, DisclosureLevel, RefusalReason};

/// Input for recording a new action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDraft {
    pub action_type: ActionType,
    pub subject: String,
    pub content: String,
    pub message: Option<MessageId>,
    pub attachments: Option<AttachmentSetId>,
    pub sent_date: Option<NaiveDate>,
    pub delivered_date: Option<NaiveDate>,
    pub legal_date: NaiveDate,
    pub extension: Option<u32>,
    pub disclosure_level: Option<DisclosureLevel>,
    pub refusal_reasons: Vec<RefusalReason>,
}

impl ActionDraft {
    pub fn new(action_type: ActionType, legal_date: NaiveDate) -> Self {
        Self {
            action_type,
            subject: String::new(),
            content: String::new(),
            message: None,
            attachments: None,
            sent_date: None,
            delivered_date: None,
            legal_date,
            extension: None,
            disclosure_level: None,
            refusal_reasons: Vec::new(),
        }
    }

    /// Draft sent and delivered on its legal date, the usual case for email.
    pub fn delivered(action_type: ActionType, date: NaiveDate) -> Self {
        Self::new(action_type, date).with_sent_date(date).with_delivered_date(date)
    }

    pub fn with_text(mut self, subject: impl Into<String>, content: impl Into<String>) -> Self {
        self.subject = subject.into();
        self.content = content.into();
        self
    }

    pub fn with_message(mut self, message: MessageId) -> Self {
        self.message = Some(message);
        self
    }

    pub fn with_attachments(mut self, attachments: AttachmentSetId) -> Self {
        self.attachments = Some(attachments);
        self
    }

    pub fn with_sent_date(mut self, date: NaiveDate) -> Self {
        self.sent_date = Some(date);
        self
    }

    pub fn with_delivered_date(mut self, date: NaiveDate) -> Self {
        self.delivered_date = Some(date);
        self
    }

    pub fn with_extension(mut self, workdays: u32) -> Self {
        self.extension = Some(workdays);
        self
    }

    pub fn with_disclosure_level(mut self, level: DisclosureLevel) -> Self {
        self.disclosure_level = Some(level);
        self
    }

    pub fn with_refusal_reasons(mut self, reasons: Vec<RefusalReason>) -> Self {
        self.refusal_reasons = reasons;
        self
    }

    /// Checks that type-specific fields appear only on their types.
    pub fn validate(&self) -> Result<(), DomainError> {
        let t = self.action_type;
        let mismatch = |field: &str, reason: &str| {
            DomainError::new(
                ErrorCode::ActionFieldMismatch,
                format!("{} {} on {}", field, reason, t),
            )
            .with_detail("field", field)
            .with_detail("action_type", t.to_string())
        };

        if self.extension.is_some() && !t.accepts_extension() {
            return Err(mismatch("extension", "is not allowed"));
        }
        if self.disclosure_level.is_none() && t.requires_disclosure_level() {
            return Err(mismatch("disclosure_level", "is required"));
        }
        if self.disclosure_level.is_some() && !t.accepts_disclosure_level() {
            return Err(mismatch("disclosure_level", "is not allowed"));
        }
        if !self.refusal_reasons.is_empty() && !t.accepts_refusal_reasons() {
            return Err(mismatch("refusal_reasons", "are not allowed"));
        }
        if self.delivered_date.is_none() && t.requires_delivered_date() {
            return Err(mismatch("delivered_date", "is required"));
        }
        if let (Some(sent), Some(delivered)) = (self.sent_date, self.delivered_date) {
            if delivered < sent {
                return Err(DomainError::validation(
                    "delivered_date",
                    "Delivered date precedes sent date",
                ));
            }
        }
        Ok(())
    }
}

/// A recorded legal event.
///
/// Immutable once recorded except for the snooze, the reminder guard and
/// administrative deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    id: ActionId,
    sequence: u32,
    action_type: ActionType,
    subject: String,
    content: String,
    message: Option<MessageId>,
    attachments: Option<AttachmentSetId>,
    sent_date: Option<NaiveDate>,
    delivered_date: Option<NaiveDate>,
    legal_date: NaiveDate,
    extension: Option<u32>,
    snooze: Option<NaiveDate>,
    disclosure_level: Option<DisclosureLevel>,
    refusal_reasons: Vec<RefusalReason>,
    last_deadline_reminder: Option<Timestamp>,
    created_at: Timestamp,
}

impl Action {
    /// Records a validated draft as the branch's `sequence`-th action.
    pub(crate) fn record(
        draft: ActionDraft,
        sequence: u32,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        draft.validate()?;
        Ok(Self {
            id: ActionId::new(),
            sequence,
            action_type: draft.action_type,
            subject: draft.subject,
            content: draft.content,
            message: draft.message,
            attachments: draft.attachments,
            sent_date: draft.sent_date,
            delivered_date: draft.delivered_date,
            legal_date: draft.legal_date,
            extension: draft.extension,
            snooze: None,
            disclosure_level: draft.disclosure_level,
            refusal_reasons: draft.refusal_reasons,
            last_deadline_reminder: None,
            created_at,
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Creation order within the branch, used to break legal date ties.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn message(&self) -> Option<MessageId> {
        self.message
    }

    pub fn attachments(&self) -> Option<AttachmentSetId> {
        self.attachments
    }

    pub fn sent_date(&self) -> Option<NaiveDate> {
        self.sent_date
    }

    pub fn delivered_date(&self) -> Option<NaiveDate> {
        self.delivered_date
    }

    pub fn legal_date(&self) -> NaiveDate {
        self.legal_date
    }

    pub fn extension(&self) -> Option<u32> {
        self.extension
    }

    pub fn snooze(&self) -> Option<NaiveDate> {
        self.snooze
    }

    pub fn disclosure_level(&self) -> Option<DisclosureLevel> {
        self.disclosure_level
    }

    pub fn refusal_reasons(&self) -> &[RefusalReason] {
        &self.refusal_reasons
    }

    pub fn last_deadline_reminder(&self) -> Option<Timestamp> {
        self.last_deadline_reminder
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Chronological position within a branch.
    pub fn order_key(&self) -> (NaiveDate, u32) {
        (self.legal_date, self.sequence)
    }

    // ───────────────────────────────────────────────────────────────
    // Mutable state
    // ───────────────────────────────────────────────────────────────

    pub(crate) fn set_snooze(&mut self, snooze: Option<NaiveDate>) {
        self.snooze = snooze;
    }

    pub(crate) fn mark_deadline_reminder(&mut self, at: Timestamp) {
        self.last_deadline_reminder = Some(at);
    }

    pub(crate) fn attach_message(&mut self, message: MessageId) {
        self.message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn extension_only_on_extension() {
        let ok = ActionDraft::delivered(ActionType::Extension, date(2010, 10, 8)).with_extension(4);
        assert!(ok.validate().is_ok());

        let err = ActionDraft::delivered(ActionType::Confirmation, date(2010, 10, 8))
            .with_extension(4)
            .validate()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ActionFieldMismatch);
        assert_eq!(err.details.get("field"), Some(&"extension".to_string()));
    }

    #[test]
    fn disclosure_requires_level() {
        let draft = ActionDraft::delivered(ActionType::Disclosure, date(2010, 10, 8));
        assert!(draft.clone().validate().is_err());
        assert!(draft
            .with_disclosure_level(DisclosureLevel::Partial)
            .validate()
            .is_ok());
    }

    #[test]
    fn disclosure_level_allowed_on_reversion_and_remandment_only() {
        for t in ActionType::ALL {
            let draft = ActionDraft::delivered(t, date(2010, 10, 8))
                .with_disclosure_level(DisclosureLevel::None);
            assert_eq!(draft.validate().is_ok(), t.accepts_disclosure_level(), "{}", t);
        }
    }

    #[test]
    fn refusal_reasons_only_on_refusal_and_affirmation() {
        let reasons = vec![RefusalReason::BusinessSecret];
        let refusal = ActionDraft::delivered(ActionType::Refusal, date(2010, 10, 8))
            .with_refusal_reasons(reasons.clone());
        assert!(refusal.validate().is_ok());

        let appeal = ActionDraft::delivered(ActionType::Appeal, date(2010, 10, 8))
            .with_refusal_reasons(reasons);
        assert!(appeal.validate().is_err());
    }

    #[test]
    fn delivered_date_required_for_delivered_based_types() {
        let draft = ActionDraft::new(ActionType::Request, date(2010, 10, 5));
        let err = draft.validate().unwrap_err();
        assert_eq!(err.details.get("field"), Some(&"delivered_date".to_string()));

        assert!(ActionDraft::new(ActionType::Confirmation, date(2010, 10, 5))
            .validate()
            .is_ok());
    }

    #[test]
    fn delivered_before_sent_is_rejected() {
        let draft = ActionDraft::new(ActionType::Request, date(2010, 10, 5))
            .with_sent_date(date(2010, 10, 5))
            .with_delivered_date(date(2010, 10, 4));
        assert_eq!(draft.validate().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn record_starts_without_snooze_or_reminder() {
        let draft = ActionDraft::delivered(ActionType::Request, date(2010, 10, 5))
            .with_text("Žiadosť", "Prosím o informácie");
        let action = Action::record(draft, 0, Timestamp::now()).unwrap();
        assert_eq!(action.snooze(), None);
        assert_eq!(action.last_deadline_reminder(), None);
        assert_eq!(action.subject(), "Žiadosť");
        assert_eq!(action.order_key(), (date(2010, 10, 5), 0));
    }
}
