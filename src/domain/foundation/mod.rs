//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and the error
//! types that form the vocabulary of the inforequest domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ActionId, ApplicantId, AttachmentSetId, BranchId, InforequestId, MessageId, ObligeeId,
};
pub use state_machine::StateMachine;
pub use timestamp::{local_today, Timestamp};
