//! Inforequest aggregate - the root entity for one request for information.
//!
//! An Inforequest owns a tree of branches (one per obligee the request ended up
//! with), the correspondence routed to its reply address and the guards the
//! scheduler uses to stay idempotent.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ActionId, ApplicantId, BranchId, DomainError, ErrorCode, InforequestId, MessageId,
    StateMachine, Timestamp,
};

use super::{
    ActionDraft, ActionType, Applicant, ApplicantSnapshot, Branch, EmailClassification,
    InforequestEmail, Jurisdiction, Mailbox, Message, MessageDirection, Obligee, ObligeeSnapshot,
};

/// The Inforequest aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inforequest {
    id: InforequestId,
    applicant_id: ApplicantId,
    applicant: ApplicantSnapshot,
    unique_email: String,
    submission_date: NaiveDate,
    closed: bool,
    published_on: Option<NaiveDate>,
    last_undecided_email_reminder: Option<Timestamp>,
    branches: Vec<Branch>,
    emails: Vec<InforequestEmail>,
    version: u64,
    created_at: Timestamp,
}

impl Inforequest {
    /// Submits a new inforequest: freezes both parties and records the REQUEST
    /// on the main branch.
    pub fn submit(
        applicant: &Applicant,
        obligee: &Obligee,
        unique_email: impl Into<String>,
        request: ActionDraft,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let unique_email = unique_email.into();
        if unique_email.trim().is_empty() {
            return Err(DomainError::validation(
                "unique_email",
                "Reply address cannot be empty",
            ));
        }
        if request.action_type != ActionType::Request {
            return Err(DomainError::new(
                ErrorCode::InvalidActionSequence,
                format!("Inforequest must open with REQUEST, got {}", request.action_type),
            ));
        }

        let submission_date = request.legal_date;
        let mut main = Branch::new(ObligeeSnapshot::from(obligee), None);
        main.append(request, now)?;

        Ok(Self {
            id: InforequestId::new(),
            applicant_id: applicant.id,
            applicant: ApplicantSnapshot::from(applicant),
            unique_email,
            submission_date,
            closed: false,
            published_on: None,
            last_undecided_email_reminder: None,
            branches: vec![main],
            emails: Vec::new(),
            version: 0,
            created_at: now,
        })
    }

    /// Checks every structural invariant of a loaded aggregate.
    ///
    /// Repositories call this after decoding so a corrupted record is rejected
    /// instead of being acted upon.
    pub fn validate(&self) -> Result<(), DomainError> {
        let corrupted = |message: String| {
            DomainError::new(ErrorCode::BranchTreeCorrupted, message)
                .with_detail("inforequest_id", self.id.to_string())
        };

        let roots: Vec<&Branch> = self.branches.iter().filter(|b| b.is_main()).collect();
        if roots.len() != 1 {
            return Err(corrupted(format!(
                "Expected exactly one main branch, found {}",
                roots.len()
            )));
        }
        if !self.branches[0].is_main() {
            return Err(corrupted("Main branch is not stored first".to_string()));
        }

        let mut owner: HashMap<ActionId, (BranchId, ActionType)> = HashMap::new();
        for branch in &self.branches {
            if !branch.is_consistent() {
                return Err(corrupted(format!("Branch {} is out of order", branch.id())));
            }
            if branch.last_action().is_none() {
                return Err(corrupted(format!("Branch {} has no actions", branch.id())));
            }
            for action in branch.actions_ordered() {
                if owner
                    .insert(action.id(), (branch.id(), action.action_type()))
                    .is_some()
                {
                    return Err(corrupted(format!("Action {} appears twice", action.id())));
                }
            }
        }

        for branch in &self.branches {
            let Some(parent) = branch.advanced_by() else {
                continue;
            };
            match owner.get(&parent) {
                None => {
                    return Err(corrupted(format!(
                        "Branch {} advanced by foreign action {}",
                        branch.id(),
                        parent
                    )))
                }
                Some((_, t)) if *t != ActionType::Advancement => {
                    return Err(corrupted(format!(
                        "Branch {} advanced by {} action {}",
                        branch.id(),
                        t,
                        parent
                    )))
                }
                Some(_) => {}
            }
        }

        // Every branch must be reachable from the main one; anything left
        // over sits on a cycle.
        let reachable = self.reachable_from(roots[0].id());
        if reachable.len() != self.branches.len() {
            return Err(corrupted("Branch graph contains a cycle".to_string()));
        }
        Ok(())
    }

    fn reachable_from(&self, start: BranchId) -> HashSet<BranchId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(branch) = self.branch(id) {
                for child in self.children_of(branch) {
                    queue.push_back(child.id());
                }
            }
        }
        seen
    }

    fn children_of<'a>(&'a self, branch: &'a Branch) -> impl Iterator<Item = &'a Branch> + 'a {
        self.branches.iter().filter(move |b| {
            b.advanced_by()
                .map_or(false, |parent| branch.contains_action(parent))
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> InforequestId {
        self.id
    }

    pub fn applicant_id(&self) -> ApplicantId {
        self.applicant_id
    }

    pub fn applicant(&self) -> &ApplicantSnapshot {
        &self.applicant
    }

    pub fn unique_email(&self) -> &str {
        &self.unique_email
    }

    pub fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn published_on(&self) -> Option<NaiveDate> {
        self.published_on
    }

    pub fn is_published(&self) -> bool {
        self.published_on.is_some()
    }

    pub fn last_undecided_email_reminder(&self) -> Option<Timestamp> {
        self.last_undecided_email_reminder
    }

    pub fn emails(&self) -> &[InforequestEmail] {
        &self.emails
    }

    /// Optimistic concurrency token, bumped by the repository on every update.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// The branch holding the original request.
    pub fn main_branch(&self) -> &Branch {
        // `submit` creates the main branch first and nothing removes it.
        &self.branches[0]
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }

    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id() == id)
    }

    fn branch_mut(&mut self, id: BranchId) -> Result<&mut Branch, DomainError> {
        let inforequest_id = self.id;
        self.branches
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::BranchNotFound, "Branch not found")
                    .with_detail("inforequest_id", inforequest_id.to_string())
                    .with_detail("branch_id", id.to_string())
            })
    }

    /// Branch owning the given action.
    pub fn branch_of_action(&self, action_id: ActionId) -> Option<&Branch> {
        self.branches.iter().find(|b| b.contains_action(action_id))
    }

    /// Branches spawned by the given branch's advancements.
    pub fn advanced_branches(&self, branch_id: BranchId) -> Vec<&Branch> {
        match self.branch(branch_id) {
            Some(branch) => self.children_of(branch).collect(),
            None => Vec::new(),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Recording actions
    // ───────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.closed {
            return Err(DomainError::new(
                ErrorCode::InforequestClosed,
                "Inforequest is closed",
            )
            .with_detail("inforequest_id", self.id.to_string()));
        }
        Ok(())
    }

    /// Records an applicant or obligee action on a branch.
    ///
    /// Implicit actions are created only by the system and advancements go
    /// through [`Inforequest::add_advancement`].
    pub fn add_action(
        &mut self,
        branch_id: BranchId,
        draft: ActionDraft,
        now: Timestamp,
    ) -> Result<ActionId, DomainError> {
        self.ensure_open()?;
        let t = draft.action_type;
        if t.is_implicit_action() {
            return Err(DomainError::new(
                ErrorCode::InvalidActionSequence,
                format!("{} is recorded by the system only", t),
            ));
        }
        if t == ActionType::Advancement {
            return Err(DomainError::new(
                ErrorCode::InvalidAdvancement,
                "Advancements must name their target obligees",
            ));
        }
        self.branch_mut(branch_id)?.append(draft, now)
    }

    /// Records an ADVANCEMENT and opens one branch per target obligee.
    ///
    /// Every part is checked before anything changes, so a failure leaves
    /// the aggregate untouched.
    pub fn add_advancement(
        &mut self,
        branch_id: BranchId,
        draft: ActionDraft,
        targets: &[Obligee],
        now: Timestamp,
    ) -> Result<(ActionId, Vec<BranchId>), DomainError> {
        self.ensure_open()?;
        if draft.action_type != ActionType::Advancement {
            return Err(DomainError::new(
                ErrorCode::InvalidAdvancement,
                format!("Expected ADVANCEMENT, got {}", draft.action_type),
            ));
        }
        if targets.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InvalidAdvancement,
                "Advancement needs at least one target obligee",
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = targets.iter().find(|o| !seen.insert(o.id)) {
            return Err(DomainError::new(
                ErrorCode::InvalidAdvancement,
                "Advancement names the same obligee twice",
            )
            .with_detail("obligee_id", dup.id.to_string()));
        }

        let legal_date = draft.legal_date;
        self.branch(branch_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::BranchNotFound, "Branch not found")
                    .with_detail("branch_id", branch_id.to_string())
            })?
            .check_append(&draft)?;
        ActionDraft::new(ActionType::AdvancedRequest, legal_date).validate()?;

        let advancement = self.branch_mut(branch_id)?.append(draft, now)?;
        let mut children = Vec::with_capacity(targets.len());
        for target in targets {
            let mut child = Branch::new(ObligeeSnapshot::from(target), Some(advancement));
            child.append(ActionDraft::new(ActionType::AdvancedRequest, legal_date), now)?;
            children.push(child);
        }
        let ids = children.iter().map(Branch::id).collect();
        self.branches.extend(children);
        Ok((advancement, ids))
    }

    /// Administratively deletes the last action of a branch.
    ///
    /// Deleting an ADVANCEMENT removes every branch it spawned, recursively.
    /// Returns the ids of the removed branches.
    pub fn delete_action(&mut self, action_id: ActionId) -> Result<Vec<BranchId>, DomainError> {
        let branch = self.branch_of_action(action_id).ok_or_else(|| {
            DomainError::new(ErrorCode::ActionNotFound, "Action not found")
                .with_detail("action_id", action_id.to_string())
        })?;
        if branch.last_action().map(|a| a.id()) != Some(action_id) {
            return Err(DomainError::new(
                ErrorCode::InvalidActionSequence,
                "Only the last action of a branch can be deleted",
            )
            .with_detail("action_id", action_id.to_string()));
        }
        if branch.actions_ordered().count() == 1 {
            return Err(DomainError::new(
                ErrorCode::InvalidActionSequence,
                "The opening action of a branch cannot be deleted",
            )
            .with_detail("action_id", action_id.to_string()));
        }
        let branch_id = branch.id();

        let mut doomed = Vec::new();
        let mut queue: VecDeque<ActionId> = VecDeque::from([action_id]);
        while let Some(parent) = queue.pop_front() {
            for child in self
                .branches
                .iter()
                .filter(|b| b.advanced_by() == Some(parent))
            {
                doomed.push(child.id());
                queue.extend(child.actions_ordered().map(|a| a.id()));
            }
        }

        self.branches.retain(|b| !doomed.contains(&b.id()));
        self.branch_mut(branch_id)?.remove_action(action_id);
        Ok(doomed)
    }

    /// Postpones the deadline of a branch's last action.
    ///
    /// A snooze only ever moves later and may not precede the unmodified
    /// deadline by more than a day. `None` clears it.
    pub fn snooze(
        &mut self,
        j: &Jurisdiction,
        action_id: ActionId,
        snooze: Option<NaiveDate>,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        let branch = self.branch_of_action(action_id).ok_or_else(|| {
            DomainError::new(ErrorCode::ActionNotFound, "Action not found")
                .with_detail("action_id", action_id.to_string())
        })?;
        let invalid = |message: &str| {
            DomainError::new(ErrorCode::InvalidSnooze, message)
                .with_detail("action_id", action_id.to_string())
        };
        let action = branch
            .last_action()
            .filter(|a| a.id() == action_id)
            .ok_or_else(|| invalid("Only the last action of a branch can be snoozed"))?;
        let deadline = branch
            .deadline_of(j, action)
            .ok_or_else(|| invalid("Action has no deadline to snooze"))?;
        if let Some(date) = snooze {
            if date < deadline.deadline_date() - Duration::days(1) {
                return Err(invalid("Snooze precedes the deadline"));
            }
            if action.snooze().map_or(false, |current| date < current) {
                return Err(invalid("Snooze may only be postponed"));
            }
        }
        let branch_id = branch.id();
        if let Some(action) = self.branch_mut(branch_id)?.action_mut(action_id) {
            action.set_snooze(snooze);
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Closing and publishing
    // ───────────────────────────────────────────────────────────────

    /// True when every branch has either no pending deadline or one at least
    /// the grace period behind.
    pub fn is_closable_at(&self, j: &Jurisdiction, today: NaiveDate) -> bool {
        self.branches.iter().all(|b| b.is_closable_at(j, today))
    }

    /// Closes the inforequest, recording expirations where the obligee let a
    /// deadline pass. Returns the ids of the appended expirations.
    pub fn close_expired(
        &mut self,
        j: &Jurisdiction,
        today: NaiveDate,
        now: Timestamp,
    ) -> Result<Vec<ActionId>, DomainError> {
        self.ensure_open()?;
        if !self.is_closable_at(j, today) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Inforequest still has a pending deadline",
            )
            .with_detail("inforequest_id", self.id.to_string()));
        }
        let mut appended = Vec::new();
        for branch in &mut self.branches {
            if let Some(id) = branch.add_expiration_if_expired(j, today, now)? {
                appended.push(id);
            }
        }
        self.closed = true;
        Ok(appended)
    }

    /// Marks a closed inforequest as published. Publishing again keeps the
    /// original date.
    pub fn publish(&mut self, today: NaiveDate) -> Result<NaiveDate, DomainError> {
        if !self.closed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only closed inforequests can be published",
            )
            .with_detail("inforequest_id", self.id.to_string()));
        }
        Ok(*self.published_on.get_or_insert(today))
    }

    // ───────────────────────────────────────────────────────────────
    // Correspondence
    // ───────────────────────────────────────────────────────────────

    /// Attaches an inbound message as undecided.
    pub fn receive_email(&mut self, message: Message) -> Result<(), DomainError> {
        if message.direction != MessageDirection::Inbound {
            return Err(DomainError::validation(
                "direction",
                "Only inbound messages can be received",
            ));
        }
        self.ensure_unique_message(message.id)?;
        self.emails.push(InforequestEmail {
            message,
            classification: EmailClassification::Undecided,
        });
        Ok(())
    }

    /// Records an outbound message sent for an applicant action and links it.
    pub fn record_outbound(
        &mut self,
        action_id: ActionId,
        message: Message,
    ) -> Result<(), DomainError> {
        if message.direction != MessageDirection::Outbound {
            return Err(DomainError::validation(
                "direction",
                "Only outbound messages can be recorded as sent",
            ));
        }
        self.ensure_unique_message(message.id)?;
        let branch_id = self
            .branch_of_action(action_id)
            .map(Branch::id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ActionNotFound, "Action not found")
                    .with_detail("action_id", action_id.to_string())
            })?;
        if let Some(action) = self.branch_mut(branch_id)?.action_mut(action_id) {
            action.attach_message(message.id);
        }
        self.emails.push(InforequestEmail {
            message,
            classification: EmailClassification::ApplicantAction,
        });
        Ok(())
    }

    fn ensure_unique_message(&self, id: MessageId) -> Result<(), DomainError> {
        if self.email(id).is_some() {
            return Err(DomainError::validation(
                "message_id",
                "Message is already attached",
            ));
        }
        Ok(())
    }

    pub fn email(&self, id: MessageId) -> Option<&InforequestEmail> {
        self.emails.iter().find(|e| e.message.id == id)
    }

    fn reclassify(
        &mut self,
        id: MessageId,
        target: EmailClassification,
    ) -> Result<(), DomainError> {
        let email = self
            .emails
            .iter_mut()
            .find(|e| e.message.id == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MessageNotFound, "Message not found")
                    .with_detail("message_id", id.to_string())
            })?;
        email.classification = email.classification.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("message_id", id.to_string())
        })?;
        Ok(())
    }

    /// Checks that a received message may still be decided.
    fn ensure_decidable(&self, id: MessageId) -> Result<(), DomainError> {
        let email = self.email(id).ok_or_else(|| {
            DomainError::new(ErrorCode::MessageNotFound, "Message not found")
                .with_detail("message_id", id.to_string())
        })?;
        if !email
            .classification
            .can_transition_to(&EmailClassification::ObligeeAction)
        {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Message is already {:?}", email.classification),
            )
            .with_detail("message_id", id.to_string()));
        }
        Ok(())
    }

    /// Decides a received message as an obligee action on a branch.
    ///
    /// `targets` is used only when the action is an ADVANCEMENT.
    pub fn decide_email(
        &mut self,
        message_id: MessageId,
        branch_id: BranchId,
        draft: ActionDraft,
        targets: &[Obligee],
        now: Timestamp,
    ) -> Result<ActionId, DomainError> {
        self.ensure_decidable(message_id)?;
        if !draft.action_type.is_obligee_action() {
            return Err(DomainError::new(
                ErrorCode::InvalidActionSequence,
                format!("Received mail cannot be decided as {}", draft.action_type),
            ));
        }
        let draft = draft.with_message(message_id);
        let action_id = if draft.action_type == ActionType::Advancement {
            self.add_advancement(branch_id, draft, targets, now)?.0
        } else {
            self.add_action(branch_id, draft, now)?
        };
        self.reclassify(message_id, EmailClassification::ObligeeAction)?;
        Ok(action_id)
    }

    /// Marks a received message as unrelated or unknown.
    pub fn mark_email(
        &mut self,
        message_id: MessageId,
        classification: EmailClassification,
    ) -> Result<(), DomainError> {
        if !matches!(
            classification,
            EmailClassification::Unrelated | EmailClassification::Unknown
        ) {
            return Err(DomainError::validation(
                "classification",
                "Only UNRELATED or UNKNOWN can be set directly",
            ));
        }
        self.reclassify(message_id, classification)
    }

    pub fn has_undecided_email(&self) -> bool {
        self.emails.iter().any(InforequestEmail::is_undecided)
    }

    /// The most recently processed undecided message.
    pub fn newest_undecided_email(&self) -> Option<&InforequestEmail> {
        self.emails
            .iter()
            .filter(|e| e.is_undecided())
            .max_by_key(|e| e.message.processed_at)
    }

    /// Sender used for applicant mail: frozen name at the reply address.
    pub fn applicant_mailbox(&self) -> Mailbox {
        Mailbox::named(self.applicant.name.clone(), self.unique_email.clone())
    }

    /// Everyone an applicant action on the branch should be sent to.
    ///
    /// Recipients of earlier outbound mail, senders of earlier inbound mail and
    /// the obligee's frozen addresses, first occurrence wins.
    pub fn applicant_recipients(&self, branch_id: BranchId) -> Result<Vec<Mailbox>, DomainError> {
        let branch = self.branch(branch_id).ok_or_else(|| {
            DomainError::new(ErrorCode::BranchNotFound, "Branch not found")
                .with_detail("branch_id", branch_id.to_string())
        })?;

        let mut recipients: Vec<Mailbox> = Vec::new();
        let mut push = |mailbox: &Mailbox| {
            if !recipients.iter().any(|r| r.same_address(mailbox)) {
                recipients.push(mailbox.clone());
            }
        };
        for action in branch.actions_ordered() {
            let Some(email) = action.message().and_then(|id| self.email(id)) else {
                continue;
            };
            match email.message.direction {
                MessageDirection::Inbound => push(&email.message.from),
                MessageDirection::Outbound => email.message.recipients().for_each(&mut push),
            }
        }
        for address in &branch.obligee().emails {
            push(&Mailbox::named(branch.obligee().name.clone(), address.clone()));
        }
        Ok(recipients)
    }

    // ───────────────────────────────────────────────────────────────
    // Scheduler guards
    // ───────────────────────────────────────────────────────────────

    /// An undecided message has waited long enough and the applicant has not
    /// been reminded since it arrived.
    pub fn undecided_reminder_due(&self, j: &Jurisdiction, today: NaiveDate) -> bool {
        let Some(email) = self.newest_undecided_email() else {
            return false;
        };
        let processed = email.message.processed_at;
        if self
            .last_undecided_email_reminder
            .map_or(false, |last| last.is_after(&processed))
        {
            return false;
        }
        j.calendar.between(processed.local_date(), today)
            >= j.policy.undecided_reminder_workdays as i64
    }

    pub fn mark_undecided_email_reminder(&mut self, now: Timestamp) {
        self.last_undecided_email_reminder = Some(now);
    }

    /// Stamps the deadline reminder guard on the branch's last action.
    pub fn mark_deadline_reminder(
        &mut self,
        branch_id: BranchId,
        now: Timestamp,
    ) -> Result<ActionId, DomainError> {
        self.branch_mut(branch_id)?.mark_deadline_reminder(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ObligeeId, ValidationError};
    use crate::domain::inforequest::DisclosureLevel;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn applicant() -> Applicant {
        Applicant {
            id: ApplicantId::new(),
            name: "Jana Nováková".to_string(),
            street: "Dlhá 5".to_string(),
            city: "Bratislava".to_string(),
            zip: "811 01".to_string(),
            email: "jana@example.org".to_string(),
        }
    }

    fn obligee(name: &str, email: &str) -> Obligee {
        Obligee {
            id: ObligeeId::new(),
            name: name.to_string(),
            street: "Námestie 1".to_string(),
            city: "Trnava".to_string(),
            zip: "917 01".to_string(),
            emails: vec![email.to_string()],
        }
    }

    fn submitted() -> Inforequest {
        Inforequest::submit(
            &applicant(),
            &obligee("Mesto Trnava", "podatelna@trnava.sk"),
            "ab2c@mail.example.org",
            ActionDraft::delivered(ActionType::Request, date(2010, 10, 5)),
            Timestamp::now(),
        )
        .unwrap()
    }

    fn inbound(from: &str, processed_at: Timestamp) -> Message {
        Message {
            id: MessageId::new(),
            direction: MessageDirection::Inbound,
            from: Mailbox::new(from),
            to: vec![Mailbox::new("ab2c@mail.example.org")],
            cc: vec![],
            bcc: vec![],
            subject: "Re: Žiadosť".to_string(),
            body: "Dobrý deň".to_string(),
            attachments: None,
            processed_at,
        }
    }

    #[test]
    fn submit_freezes_parties_and_records_request() {
        let ir = submitted();
        assert_eq!(ir.applicant().name, "Jana Nováková");
        assert_eq!(ir.main_branch().obligee().name, "Mesto Trnava");
        assert_eq!(ir.submission_date(), date(2010, 10, 5));
        assert_eq!(
            ir.main_branch().last_action().unwrap().action_type(),
            ActionType::Request
        );
        assert!(!ir.is_closed());
        assert!(ir.validate().is_ok());
    }

    #[test]
    fn submit_rejects_other_opening_types() {
        let err = Inforequest::submit(
            &applicant(),
            &obligee("Obec", "obec@example.sk"),
            "x@mail.example.org",
            ActionDraft::delivered(ActionType::Appeal, date(2010, 10, 5)),
            Timestamp::now(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidActionSequence);
    }

    #[test]
    fn parties_cannot_record_implicit_actions() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let err = ir
            .add_action(
                main,
                ActionDraft::new(ActionType::Expiration, date(2010, 10, 20)),
                Timestamp::now(),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidActionSequence);
    }

    #[test]
    fn advancement_opens_one_branch_per_target() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let targets = vec![
            obligee("Úrad A", "a@example.sk"),
            obligee("Úrad B", "b@example.sk"),
            obligee("Úrad C", "c@example.sk"),
        ];
        let (advancement, children) = ir
            .add_advancement(
                main,
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 11)),
                &targets,
                Timestamp::now(),
            )
            .unwrap();

        assert_eq!(children.len(), 3);
        for id in &children {
            let child = ir.branch(*id).unwrap();
            assert_eq!(child.advanced_by(), Some(advancement));
            let opening = child.last_action().unwrap();
            assert_eq!(opening.action_type(), ActionType::AdvancedRequest);
            assert_eq!(opening.legal_date(), date(2010, 10, 11));
        }
        assert_eq!(ir.advanced_branches(main).len(), 3);
        assert!(ir.validate().is_ok());
    }

    #[test]
    fn failed_advancement_leaves_no_children() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let before = ir.clone();

        // Legal date before the request: rejected by the sequencing check.
        let err = ir
            .add_advancement(
                main,
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 1)),
                &[obligee("Úrad A", "a@example.sk")],
                Timestamp::now(),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidActionSequence);

        let dup = obligee("Úrad A", "a@example.sk");
        assert!(ir
            .add_advancement(
                main,
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 11)),
                &[dup.clone(), dup],
                Timestamp::now(),
            )
            .is_err());
        assert!(ir
            .add_advancement(
                main,
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 11)),
                &[],
                Timestamp::now(),
            )
            .is_err());

        assert_eq!(ir, before);
        assert_eq!(ir.branches().count(), 1);
    }

    #[test]
    fn deleting_advancement_removes_its_subtree() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let (advancement, children) = ir
            .add_advancement(
                main,
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 11)),
                &[obligee("Úrad A", "a@example.sk")],
                Timestamp::now(),
            )
            .unwrap();
        // Advance the advanced branch once more to get a grandchild.
        ir.add_advancement(
            children[0],
            ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 13)),
            &[obligee("Úrad B", "b@example.sk")],
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(ir.branches().count(), 3);

        let removed = ir.delete_action(advancement).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(ir.branches().count(), 1);
        assert_eq!(
            ir.main_branch().last_action().unwrap().action_type(),
            ActionType::Request
        );
        assert!(ir.validate().is_ok());
    }

    #[test]
    fn opening_action_cannot_be_deleted() {
        let mut ir = submitted();
        let request = ir.main_branch().last_action().unwrap().id();
        assert!(ir.delete_action(request).is_err());
    }

    #[test]
    fn validate_rejects_foreign_parent() {
        let mut ir = submitted();
        let stray = Branch::new(
            ObligeeSnapshot::from(&obligee("Úrad X", "x@example.sk")),
            Some(ActionId::new()),
        );
        ir.branches.push(stray);
        assert_eq!(ir.validate().unwrap_err().code, ErrorCode::BranchTreeCorrupted);
    }

    #[test]
    fn validate_rejects_non_advancement_parent() {
        let mut ir = submitted();
        let request = ir.main_branch().last_action().unwrap().id();
        let mut child = Branch::new(
            ObligeeSnapshot::from(&obligee("Úrad X", "x@example.sk")),
            Some(request),
        );
        child
            .append(
                ActionDraft::new(ActionType::AdvancedRequest, date(2010, 10, 6)),
                Timestamp::now(),
            )
            .unwrap();
        ir.branches.push(child);
        assert!(ir.validate().is_err());
    }

    #[test]
    fn validate_rejects_cycles() {
        let mut ir = submitted();
        let snapshot = ObligeeSnapshot::from(&obligee("Úrad X", "x@example.sk"));

        // Two branches advancing each other, detached from the main branch.
        let mut a = Branch::new(snapshot.clone(), Some(ActionId::new()));
        a.append(
            ActionDraft::new(ActionType::AdvancedRequest, date(2010, 10, 6)),
            Timestamp::now(),
        )
        .unwrap();
        let a_adv = a
            .append(
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 7)),
                Timestamp::now(),
            )
            .unwrap();
        let mut b = Branch::new(snapshot, Some(a_adv));
        b.append(
            ActionDraft::new(ActionType::AdvancedRequest, date(2010, 10, 7)),
            Timestamp::now(),
        )
        .unwrap();
        let b_adv = b
            .append(
                ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 8)),
                Timestamp::now(),
            )
            .unwrap();
        a.reparent(Some(b_adv));
        ir.branches.push(a);
        ir.branches.push(b);

        let err = ir.validate().unwrap_err();
        assert!(err.message.contains("cycle"));
    }

    #[test]
    fn validate_rejects_missing_root() {
        let mut ir = submitted();
        ir.branches.clear();
        assert!(ir.validate().is_err());
    }

    #[test]
    fn snooze_only_postpones() {
        let j = Jurisdiction::default();
        let mut ir = submitted();
        let request = ir.main_branch().last_action().unwrap().id();

        // Deadline is 2010-10-15; one day earlier is tolerated.
        assert!(ir.snooze(&j, request, Some(date(2010, 10, 13))).is_err());
        ir.snooze(&j, request, Some(date(2010, 10, 14))).unwrap();
        ir.snooze(&j, request, Some(date(2010, 10, 20))).unwrap();
        let err = ir
            .snooze(&j, request, Some(date(2010, 10, 18)))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSnooze);

        let d = ir.main_branch().last_deadline(&j).unwrap();
        assert_eq!(d.snooze_date(), date(2010, 10, 20));
    }

    #[test]
    fn snooze_requires_a_deadline() {
        let j = Jurisdiction::default();
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let disclosure = ir
            .add_action(
                main,
                ActionDraft::delivered(ActionType::Disclosure, date(2010, 10, 8))
                    .with_disclosure_level(DisclosureLevel::Full),
                Timestamp::now(),
            )
            .unwrap();
        assert!(ir.snooze(&j, disclosure, Some(date(2010, 12, 1))).is_err());
    }

    #[test]
    fn closing_requires_grace_and_blocks_new_actions() {
        let j = Jurisdiction::default();
        let mut ir = submitted();
        let deadline = date(2010, 10, 15);

        assert!(ir
            .close_expired(&j, j.calendar.advance(deadline, 99), Timestamp::now())
            .is_err());
        assert!(!ir.is_closed());

        let appended = ir
            .close_expired(&j, j.calendar.advance(deadline, 100), Timestamp::now())
            .unwrap();
        assert_eq!(appended.len(), 1);
        assert!(ir.is_closed());
        assert_eq!(
            ir.main_branch().last_action().unwrap().action_type(),
            ActionType::Expiration
        );

        let main = ir.main_branch().id();
        let err = ir
            .add_action(
                main,
                ActionDraft::delivered(ActionType::Appeal, date(2011, 3, 10)),
                Timestamp::now(),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InforequestClosed);
    }

    #[test]
    fn publish_is_one_way_and_needs_closing() {
        let j = Jurisdiction::default();
        let mut ir = submitted();
        assert!(ir.publish(date(2011, 1, 1)).is_err());

        ir.close_expired(&j, date(2011, 6, 1), Timestamp::now())
            .unwrap();
        assert_eq!(ir.publish(date(2011, 6, 2)).unwrap(), date(2011, 6, 2));
        assert_eq!(ir.publish(date(2011, 7, 1)).unwrap(), date(2011, 6, 2));
        assert!(ir.is_published());
    }

    #[test]
    fn received_email_is_undecided_until_decided() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let message = inbound("urad@trnava.sk", Timestamp::now());
        let message_id = message.id;
        ir.receive_email(message).unwrap();
        assert!(ir.has_undecided_email());

        let action = ir
            .decide_email(
                message_id,
                main,
                ActionDraft::delivered(ActionType::Confirmation, date(2010, 10, 7)),
                &[],
                Timestamp::now(),
            )
            .unwrap();
        assert!(!ir.has_undecided_email());
        assert_eq!(
            ir.email(message_id).unwrap().classification,
            EmailClassification::ObligeeAction
        );
        assert_eq!(
            ir.main_branch().action(action).unwrap().message(),
            Some(message_id)
        );

        // Second decision of the same message fails and records nothing.
        let count = ir.main_branch().actions_ordered().count();
        assert!(ir
            .decide_email(
                message_id,
                main,
                ActionDraft::delivered(ActionType::Disclosure, date(2010, 10, 8))
                    .with_disclosure_level(DisclosureLevel::Full),
                &[],
                Timestamp::now(),
            )
            .is_err());
        assert_eq!(ir.main_branch().actions_ordered().count(), count);
    }

    #[test]
    fn email_cannot_be_decided_as_applicant_action() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let message = inbound("urad@trnava.sk", Timestamp::now());
        let id = message.id;
        ir.receive_email(message).unwrap();
        assert!(ir
            .decide_email(
                id,
                main,
                ActionDraft::delivered(ActionType::ClarificationResponse, date(2010, 10, 7)),
                &[],
                Timestamp::now(),
            )
            .is_err());
        assert!(ir.has_undecided_email());
    }

    #[test]
    fn mark_email_accepts_only_unrelated_or_unknown() {
        let mut ir = submitted();
        let message = inbound("spam@example.com", Timestamp::now());
        let id = message.id;
        ir.receive_email(message).unwrap();

        assert!(ir.mark_email(id, EmailClassification::ObligeeAction).is_err());
        ir.mark_email(id, EmailClassification::Unknown).unwrap();
        ir.mark_email(id, EmailClassification::Unrelated).unwrap();
        assert!(ir.mark_email(id, EmailClassification::Unknown).is_err());
    }

    #[test]
    fn recipients_are_harvested_from_branch_correspondence() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        let request = ir.main_branch().last_action().unwrap().id();

        let sent = Message {
            id: MessageId::new(),
            direction: MessageDirection::Outbound,
            from: ir.applicant_mailbox(),
            to: vec![Mailbox::new("podatelna@trnava.sk")],
            cc: vec![Mailbox::new("primator@trnava.sk")],
            bcc: vec![],
            subject: "Žiadosť".to_string(),
            body: String::new(),
            attachments: None,
            processed_at: Timestamp::now(),
        };
        ir.record_outbound(request, sent).unwrap();

        let reply = inbound("referent@trnava.sk", Timestamp::now());
        let reply_id = reply.id;
        ir.receive_email(reply).unwrap();
        ir.decide_email(
            reply_id,
            main,
            ActionDraft::delivered(ActionType::ClarificationRequest, date(2010, 10, 7)),
            &[],
            Timestamp::now(),
        )
        .unwrap();

        let addresses: Vec<String> = ir
            .applicant_recipients(main)
            .unwrap()
            .into_iter()
            .map(|m| m.address)
            .collect();
        assert_eq!(
            addresses,
            vec![
                "podatelna@trnava.sk",
                "primator@trnava.sk",
                "referent@trnava.sk"
            ]
        );
    }

    #[test]
    fn applicant_mailbox_uses_frozen_name_and_reply_address() {
        let ir = submitted();
        assert_eq!(
            ir.applicant_mailbox().to_string(),
            "Jana Nováková <ab2c@mail.example.org>"
        );
    }

    #[test]
    fn undecided_reminder_due_after_five_workdays() {
        let j = Jurisdiction::default();
        let mut ir = submitted();
        let processed = Timestamp::from_local(date(2010, 10, 5), 12, 0).unwrap();
        ir.receive_email(inbound("urad@trnava.sk", processed)).unwrap();

        assert!(!ir.undecided_reminder_due(&j, date(2010, 10, 11)));
        assert!(ir.undecided_reminder_due(&j, date(2010, 10, 12)));

        ir.mark_undecided_email_reminder(Timestamp::from_local(date(2010, 10, 12), 9, 0).unwrap());
        assert!(!ir.undecided_reminder_due(&j, date(2010, 10, 20)));

        // A newer undecided message re-arms the reminder.
        let newer = Timestamp::from_local(date(2010, 10, 13), 12, 0).unwrap();
        ir.receive_email(inbound("urad@trnava.sk", newer)).unwrap();
        assert!(ir.undecided_reminder_due(&j, date(2010, 10, 20)));
    }

    #[test]
    fn serde_round_trip_preserves_tree() {
        let mut ir = submitted();
        let main = ir.main_branch().id();
        ir.add_advancement(
            main,
            ActionDraft::delivered(ActionType::Advancement, date(2010, 10, 11)),
            &[obligee("Úrad A", "a@example.sk")],
            Timestamp::now(),
        )
        .unwrap();

        let json = serde_json::to_string(&ir).unwrap();
        let back: Inforequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ir);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn validation_errors_convert() {
        let err: DomainError = ValidationError::empty_field("subject").into();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }
}
