//! Branch entity - one obligee's thread of actions.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::deadline::{Deadline, DeadlineRole};
use crate::domain::foundation::{
    ActionId, BranchId, DomainError, ErrorCode, StateMachine, Timestamp,
};

use super::{
    Action, ActionDraft, ActionType, DeadlineBase, DeadlineRule, DisclosureLevel, Jurisdiction,
    ObligeeSnapshot,
};

/// One obligee's thread of actions within an inforequest.
///
/// The root branch has no `advanced_by`; every other branch was spawned by an
/// ADVANCEMENT action on another branch of the same inforequest. Actions are
/// kept sorted by `(legal_date, sequence)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    id: BranchId,
    obligee: ObligeeSnapshot,
    advanced_by: Option<ActionId>,
    actions: Vec<Action>,
    next_sequence: u32,
}

impl Branch {
    pub(crate) fn new(obligee: ObligeeSnapshot, advanced_by: Option<ActionId>) -> Self {
        Self {
            id: BranchId::new(),
            obligee,
            advanced_by,
            actions: Vec::new(),
            next_sequence: 0,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn obligee(&self) -> &ObligeeSnapshot {
        &self.obligee
    }

    /// The ADVANCEMENT that spawned this branch, `None` for the root.
    pub fn advanced_by(&self) -> Option<ActionId> {
        self.advanced_by
    }

    pub fn is_main(&self) -> bool {
        self.advanced_by.is_none()
    }

    /// Actions in chronological order. Cheap to call repeatedly.
    pub fn actions_ordered(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id() == id)
    }

    pub fn contains_action(&self, id: ActionId) -> bool {
        self.action(id).is_some()
    }

    /// The action recorded immediately before `id`.
    pub fn previous_action(&self, id: ActionId) -> Option<&Action> {
        let index = self.actions.iter().position(|a| a.id() == id)?;
        index.checked_sub(1).map(|i| &self.actions[i])
    }

    /// True when actions are sorted and their sequence numbers are unique.
    pub(crate) fn is_consistent(&self) -> bool {
        self.actions
            .windows(2)
            .all(|w| w[0].order_key() < w[1].order_key())
            && self.actions.iter().all(|a| a.sequence() < self.next_sequence)
    }

    // ───────────────────────────────────────────────────────────────
    // Deadlines
    // ───────────────────────────────────────────────────────────────

    /// Deadline the given action of this branch imposes, if any.
    pub fn deadline_of<'j>(&self, j: &'j Jurisdiction, action: &Action) -> Option<Deadline<'j>> {
        let t = action.action_type();
        match t.deadline_rule() {
            DeadlineRule::None => None,
            DeadlineRule::Own {
                role,
                base,
                waived_by_full_disclosure,
            } => {
                if waived_by_full_disclosure
                    && action.disclosure_level() == Some(DisclosureLevel::Full)
                {
                    return None;
                }
                let term = j.policy.own_term(t)?;
                let base_date = match base {
                    DeadlineBase::Delivered => action.delivered_date()?,
                    DeadlineBase::Legal => action.legal_date(),
                    DeadlineBase::LegalAfterTravel => j
                        .calendar
                        .advance(action.legal_date(), j.policy.remand_travel_workdays),
                };
                Some(Deadline::new(
                    &j.calendar,
                    role,
                    base_date,
                    term,
                    action.snooze(),
                ))
            }
            DeadlineRule::Inherited { extends } => {
                let previous = self.previous_action(action.id())?;
                let inherited = self.deadline_of(j, previous)?;
                let term = if extends {
                    inherited.term().extended(action.extension().unwrap_or(0))
                } else {
                    inherited.term()
                };
                Some(Deadline::new(
                    &j.calendar,
                    inherited.role(),
                    inherited.base_date(),
                    term,
                    action.snooze(),
                ))
            }
        }
    }

    /// Deadline of the branch's last action.
    pub fn last_deadline<'j>(&self, j: &'j Jurisdiction) -> Option<Deadline<'j>> {
        self.last_action().and_then(|a| self.deadline_of(j, a))
    }

    pub fn has_deadline(&self, j: &Jurisdiction, action: &Action) -> bool {
        self.deadline_of(j, action).is_some()
    }

    pub fn has_applicant_deadline(&self, j: &Jurisdiction, action: &Action) -> bool {
        self.deadline_of(j, action)
            .map_or(false, |d| d.role() == DeadlineRole::Applicant)
    }

    pub fn has_obligee_deadline(&self, j: &Jurisdiction, action: &Action) -> bool {
        self.deadline_of(j, action)
            .map_or(false, |d| d.role() == DeadlineRole::Obligee)
    }

    // ───────────────────────────────────────────────────────────────
    // Recording actions
    // ───────────────────────────────────────────────────────────────

    /// Checks that `draft` may be appended, without mutating anything.
    pub(crate) fn check_append(&self, draft: &ActionDraft) -> Result<(), DomainError> {
        draft.validate()?;
        let t = draft.action_type;
        match self.last_action() {
            None => {
                let expected = if self.is_main() {
                    ActionType::Request
                } else {
                    ActionType::AdvancedRequest
                };
                if t != expected {
                    return Err(DomainError::new(
                        ErrorCode::InvalidActionSequence,
                        format!("Branch must open with {}, got {}", expected, t),
                    )
                    .with_detail("branch_id", self.id.to_string()));
                }
            }
            Some(last) => {
                last.action_type().transition_to(t).map_err(|e| {
                    DomainError::new(ErrorCode::InvalidActionSequence, e.to_string())
                        .with_detail("branch_id", self.id.to_string())
                        .with_detail("last_action", last.action_type().to_string())
                })?;
                if draft.legal_date < last.legal_date() {
                    return Err(DomainError::new(
                        ErrorCode::InvalidActionSequence,
                        format!(
                            "Legal date {} precedes the last action's {}",
                            draft.legal_date,
                            last.legal_date()
                        ),
                    )
                    .with_detail("branch_id", self.id.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Appends a new action after the current last one.
    pub(crate) fn append(
        &mut self,
        draft: ActionDraft,
        now: Timestamp,
    ) -> Result<ActionId, DomainError> {
        self.check_append(&draft)?;
        let action = Action::record(draft, self.next_sequence, now)?;
        let id = action.id();
        self.next_sequence += 1;
        self.actions.push(action);
        Ok(id)
    }

    #[cfg(test)]
    pub(crate) fn reparent(&mut self, advanced_by: Option<ActionId>) {
        self.advanced_by = advanced_by;
    }

    pub(crate) fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id() == id)
    }

    pub(crate) fn remove_action(&mut self, id: ActionId) -> Option<Action> {
        let index = self.actions.iter().position(|a| a.id() == id)?;
        Some(self.actions.remove(index))
    }

    /// Records that the obligee let the last action's deadline pass.
    ///
    /// Appends EXPIRATION (APPEAL_EXPIRATION after an APPEAL) dated the day
    /// after the snoozed deadline, or on the last action's legal date when a
    /// late confirmation or extension was recorded after that. Does nothing
    /// unless the last action carries an obligee deadline missed at `today`,
    /// so repeated calls are harmless.
    pub fn add_expiration_if_expired(
        &mut self,
        j: &Jurisdiction,
        today: NaiveDate,
        now: Timestamp,
    ) -> Result<Option<ActionId>, DomainError> {
        let (expiration_type, legal_date) = {
            let Some(last) = self.last_action() else {
                return Ok(None);
            };
            let Some(deadline) = self.deadline_of(j, last) else {
                return Ok(None);
            };
            if !deadline.is_obligee_deadline() || !deadline.is_snooze_missed_at(today) {
                return Ok(None);
            }
            let expiration_type = if last.action_type() == ActionType::Appeal {
                ActionType::AppealExpiration
            } else {
                ActionType::Expiration
            };
            let missed_on = deadline.snooze_date() + Duration::days(1);
            (expiration_type, missed_on.max(last.legal_date()))
        };
        self.append(ActionDraft::new(expiration_type, legal_date), now)
            .map(Some)
    }

    // ───────────────────────────────────────────────────────────────
    // Scheduler predicates
    // ───────────────────────────────────────────────────────────────

    /// No pending deadline, or the pending one is far enough behind.
    pub fn is_closable_at(&self, j: &Jurisdiction, today: NaiveDate) -> bool {
        match self.last_deadline(j) {
            None => true,
            Some(d) => d.snooze_workdays_behind_at(today) >= j.policy.close_grace_workdays as i64,
        }
    }

    /// The obligee missed the last action's deadline and has not been
    /// reminded since it was last moved.
    pub fn obligee_reminder_due(&self, j: &Jurisdiction, today: NaiveDate) -> bool {
        let Some(last) = self.last_action() else {
            return false;
        };
        let Some(deadline) = self.deadline_of(j, last) else {
            return false;
        };
        if !deadline.is_obligee_deadline() || !deadline.is_snooze_missed_at(today) {
            return false;
        }
        // A reminder sent after the (possibly snoozed) deadline was missed
        // covers it; moving the deadline re-arms the reminder.
        match last.last_deadline_reminder() {
            Some(reminded) => !deadline.is_snooze_missed_at(reminded.local_date()),
            None => true,
        }
    }

    /// The applicant's deadline is close and they have never been reminded.
    pub fn applicant_reminder_due(&self, j: &Jurisdiction, today: NaiveDate) -> bool {
        let Some(last) = self.last_action() else {
            return false;
        };
        if last.last_deadline_reminder().is_some() {
            return false;
        }
        match self.deadline_of(j, last) {
            Some(d) if d.is_applicant_deadline() => {
                d.snooze_workdays_remaining_at(today) <= j.policy.applicant_reminder_workdays as i64
            }
            _ => false,
        }
    }

    /// Stamps the reminder guard on the last action.
    pub(crate) fn mark_deadline_reminder(&mut self, now: Timestamp) -> Result<ActionId, DomainError> {
        let last = self.actions.last_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::ActionNotFound, "Branch has no actions")
                .with_detail("branch_id", self.id.to_string())
        })?;
        last.mark_deadline_reminder(now);
        Ok(last.id())
    }
}
