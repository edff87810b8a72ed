//! Legal action types and their deadline rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::deadline::DeadlineRole;
use crate::domain::foundation::StateMachine;

/// The fifteen kinds of legal event that may happen on a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Request,
    ClarificationResponse,
    Appeal,
    Confirmation,
    Extension,
    Advancement,
    ClarificationRequest,
    Disclosure,
    Refusal,
    Affirmation,
    Reversion,
    Remandment,
    AdvancedRequest,
    Expiration,
    AppealExpiration,
}

/// Who performs an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRole {
    Applicant,
    Obligee,
    /// Created by the system, never by a party.
    Implicit,
}

/// Date a deadline of its own is counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBase {
    /// The action's `delivered_date`.
    Delivered,
    /// The action's `legal_date`.
    Legal,
    /// The action's `legal_date` advanced by the travel allowance.
    LegalAfterTravel,
}

/// How an action type derives its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineRule {
    /// No deadline at all.
    None,
    /// A fresh term counted from the action itself.
    Own {
        role: DeadlineRole,
        base: DeadlineBase,
        /// No deadline when the obligee disclosed everything.
        waived_by_full_disclosure: bool,
    },
    /// The previous action's deadline, optionally prolonged by `extension`.
    Inherited { extends: bool },
}

impl ActionType {
    /// Every action type, in declaration order.
    pub const ALL: [ActionType; 15] = [
        ActionType::Request,
        ActionType::ClarificationResponse,
        ActionType::Appeal,
        ActionType::Confirmation,
        ActionType::Extension,
        ActionType::Advancement,
        ActionType::ClarificationRequest,
        ActionType::Disclosure,
        ActionType::Refusal,
        ActionType::Affirmation,
        ActionType::Reversion,
        ActionType::Remandment,
        ActionType::AdvancedRequest,
        ActionType::Expiration,
        ActionType::AppealExpiration,
    ];

    pub fn role(&self) -> ActionRole {
        use ActionType::*;
        match self {
            Request | ClarificationResponse | Appeal => ActionRole::Applicant,
            AdvancedRequest | Expiration | AppealExpiration => ActionRole::Implicit,
            Confirmation | Extension | Advancement | ClarificationRequest | Disclosure
            | Refusal | Affirmation | Reversion | Remandment => ActionRole::Obligee,
        }
    }

    pub fn is_applicant_action(&self) -> bool {
        self.role() == ActionRole::Applicant
    }

    pub fn is_obligee_action(&self) -> bool {
        self.role() == ActionRole::Obligee
    }

    pub fn is_implicit_action(&self) -> bool {
        self.role() == ActionRole::Implicit
    }

    /// One row per variant: where the deadline of an action of this type comes from.
    pub fn deadline_rule(&self) -> DeadlineRule {
        use ActionType::*;
        use DeadlineBase::*;
        use DeadlineRole as R;
        let own = |role, base| DeadlineRule::Own {
            role,
            base,
            waived_by_full_disclosure: false,
        };
        match self {
            Request => own(R::Obligee, Delivered),
            ClarificationResponse => own(R::Obligee, Delivered),
            Appeal => own(R::Obligee, Delivered),
            Confirmation => DeadlineRule::Inherited { extends: false },
            Extension => DeadlineRule::Inherited { extends: true },
            Advancement => DeadlineRule::None,
            ClarificationRequest => own(R::Applicant, Delivered),
            Disclosure => DeadlineRule::Own {
                role: R::Applicant,
                base: Delivered,
                waived_by_full_disclosure: true,
            },
            Refusal => own(R::Applicant, Delivered),
            Affirmation => DeadlineRule::None,
            Reversion => DeadlineRule::None,
            Remandment => own(R::Obligee, LegalAfterTravel),
            AdvancedRequest => own(R::Obligee, LegalAfterTravel),
            Expiration => own(R::Applicant, Legal),
            AppealExpiration => DeadlineRule::None,
        }
    }

    /// True when recording this type needs a `delivered_date`.
    pub fn requires_delivered_date(&self) -> bool {
        matches!(
            self.deadline_rule(),
            DeadlineRule::Own {
                base: DeadlineBase::Delivered,
                ..
            }
        )
    }

    pub fn accepts_extension(&self) -> bool {
        matches!(self, ActionType::Extension)
    }

    pub fn requires_disclosure_level(&self) -> bool {
        matches!(self, ActionType::Disclosure)
    }

    pub fn accepts_disclosure_level(&self) -> bool {
        matches!(
            self,
            ActionType::Disclosure | ActionType::Reversion | ActionType::Remandment
        )
    }

    pub fn accepts_refusal_reasons(&self) -> bool {
        matches!(self, ActionType::Refusal | ActionType::Affirmation)
    }

    /// Types that may open a branch: the request on the root, an advanced
    /// request on every advanced branch.
    pub fn opens_branch(&self) -> bool {
        matches!(self, ActionType::Request | ActionType::AdvancedRequest)
    }
}

impl StateMachine for ActionType {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Legal successors of an action within its branch.
    fn valid_transitions(&self) -> Vec<Self> {
        use ActionType::*;
        match self {
            Request | ClarificationResponse | AdvancedRequest | Remandment => vec![
                Confirmation,
                Extension,
                Advancement,
                ClarificationRequest,
                Disclosure,
                Refusal,
                Expiration,
            ],
            Confirmation => vec![
                Extension,
                Advancement,
                ClarificationRequest,
                Disclosure,
                Refusal,
                Expiration,
            ],
            Extension => vec![
                Advancement,
                ClarificationRequest,
                Disclosure,
                Refusal,
                Expiration,
            ],
            ClarificationRequest => vec![ClarificationResponse],
            Disclosure | Refusal | Expiration => vec![Appeal],
            Appeal => vec![Affirmation, Reversion, Remandment, AppealExpiration],
            Advancement | Affirmation | Reversion | AppealExpiration => vec![],
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::Request => "REQUEST",
            ActionType::ClarificationResponse => "CLARIFICATION_RESPONSE",
            ActionType::Appeal => "APPEAL",
            ActionType::Confirmation => "CONFIRMATION",
            ActionType::Extension => "EXTENSION",
            ActionType::Advancement => "ADVANCEMENT",
            ActionType::ClarificationRequest => "CLARIFICATION_REQUEST",
            ActionType::Disclosure => "DISCLOSURE",
            ActionType::Refusal => "REFUSAL",
            ActionType::Affirmation => "AFFIRMATION",
            ActionType::Reversion => "REVERSION",
            ActionType::Remandment => "REMANDMENT",
            ActionType::AdvancedRequest => "ADVANCED_REQUEST",
            ActionType::Expiration => "EXPIRATION",
            ActionType::AppealExpiration => "APPEAL_EXPIRATION",
        };
        write!(f, "{}", s)
    }
}

/// How much the obligee disclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureLevel {
    None,
    Partial,
    Full,
}

/// Statutory grounds an obligee may cite when refusing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    DoesNotHave,
    DoesNotProvide,
    DoesNotCreate,
    Copyright,
    BusinessSecret,
    Personal,
    Confidential,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_the_legal_table() {
        use ActionType::*;
        let applicant: Vec<_> = ActionType::ALL
            .iter()
            .filter(|t| t.is_applicant_action())
            .copied()
            .collect();
        let implicit: Vec<_> = ActionType::ALL
            .iter()
            .filter(|t| t.is_implicit_action())
            .copied()
            .collect();
        assert_eq!(applicant, vec![Request, ClarificationResponse, Appeal]);
        assert_eq!(implicit, vec![AdvancedRequest, Expiration, AppealExpiration]);
        assert_eq!(
            ActionType::ALL.iter().filter(|t| t.is_obligee_action()).count(),
            9
        );
    }

    #[test]
    fn delivered_date_required_only_for_delivered_based_types() {
        use ActionType::*;
        let required: Vec<_> = ActionType::ALL
            .iter()
            .filter(|t| t.requires_delivered_date())
            .copied()
            .collect();
        assert_eq!(
            required,
            vec![
                Request,
                ClarificationResponse,
                Appeal,
                ClarificationRequest,
                Disclosure,
                Refusal
            ]
        );
    }

    #[test]
    fn clarification_request_only_followed_by_response() {
        use ActionType::*;
        assert!(ClarificationRequest.can_transition_to(&ClarificationResponse));
        assert!(ClarificationRequest.transition_to(Disclosure).is_err());
    }

    #[test]
    fn appeal_ends_in_decision_or_expiration() {
        use ActionType::*;
        assert_eq!(
            Appeal.valid_transitions(),
            vec![Affirmation, Reversion, Remandment, AppealExpiration]
        );
    }

    #[test]
    fn extension_cannot_follow_extension() {
        use ActionType::*;
        assert!(Confirmation.can_transition_to(&Extension));
        assert!(!Extension.can_transition_to(&Extension));
    }

    #[test]
    fn terminal_types() {
        use ActionType::*;
        for t in [Advancement, Affirmation, Reversion, AppealExpiration] {
            assert!(t.is_terminal(), "{} should be terminal", t);
        }
        assert!(!Remandment.is_terminal());
    }

    #[test]
    fn every_obligee_deadline_bearing_type_may_expire() {
        use ActionType::*;
        for t in ActionType::ALL {
            let obligee_deadline = matches!(
                t.deadline_rule(),
                DeadlineRule::Own {
                    role: DeadlineRole::Obligee,
                    ..
                } | DeadlineRule::Inherited { .. }
            );
            if obligee_deadline {
                let expiry = if t == Appeal { AppealExpiration } else { Expiration };
                assert!(t.can_transition_to(&expiry), "{} cannot expire", t);
            }
        }
    }

    #[test]
    fn display_uses_screaming_case() {
        assert_eq!(ActionType::AppealExpiration.to_string(), "APPEAL_EXPIRATION");
        assert_eq!(ActionType::Request.to_string(), "REQUEST");
    }
}
