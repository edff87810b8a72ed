//! State machine trait for closed enums with a transition table.
//!
//! Used for the legal succession of action types within a branch and for
//! the classification lifecycle of inbound correspondence.

use super::ValidationError;

/// Trait for enums whose values may only follow each other in fixed ways.
///
/// Implementors define valid transitions and get a validated
/// `transition_to` for free.
///
/// ```ignore
/// impl StateMachine for EmailClassification {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         self.valid_transitions().contains(target)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Undecided => vec![ObligeeAction, Unrelated, Unknown],
///             _ => vec![],
///         }
///     }
/// }
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns every target reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition, returning an error when it is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when nothing may follow this value.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Amber,
        Off,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Light::*;
            match self {
                Red => vec![Green, Off],
                Green => vec![Amber, Off],
                Amber => vec![Red, Off],
                Off => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_listed_target() {
        assert_eq!(Light::Red.transition_to(Light::Green).unwrap(), Light::Green);
    }

    #[test]
    fn transition_to_fails_for_unlisted_target() {
        let err = Light::Red.transition_to(Light::Amber).unwrap_err();
        assert!(err.to_string().contains("Cannot transition from Red to Amber"));
    }

    #[test]
    fn terminal_only_when_no_targets() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Amber.is_terminal());
    }
}
