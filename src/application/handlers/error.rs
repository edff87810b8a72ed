//! Errors returned by the command handlers.

use thiserror::Error;

use crate::domain::foundation::{
    ApplicantId, DomainError, ErrorCode, InforequestId, ObligeeId,
};
use crate::ports::TransportError;

/// Failure of an inforequest command.
#[derive(Debug, Clone, Error)]
pub enum InforequestError {
    #[error("Inforequest not found: {0}")]
    NotFound(InforequestId),

    #[error("Applicant not found: {0}")]
    ApplicantNotFound(ApplicantId),

    #[error("Obligee not found: {0}")]
    ObligeeNotFound(ObligeeId),

    /// No inforequest owns any of the message's recipient addresses.
    #[error("Message is not addressed to any inforequest: {0}")]
    Unassigned(String),

    #[error("No free reply address after {0} attempts")]
    ReplyAddressExhausted(usize),

    #[error("Email could not be sent: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl InforequestError {
    pub fn code(&self) -> ErrorCode {
        match self {
            InforequestError::NotFound(_) => ErrorCode::InforequestNotFound,
            InforequestError::ApplicantNotFound(_) => ErrorCode::ApplicantNotFound,
            InforequestError::ObligeeNotFound(_) => ErrorCode::ObligeeNotFound,
            InforequestError::Unassigned(_) => ErrorCode::InforequestNotFound,
            InforequestError::ReplyAddressExhausted(_) => ErrorCode::InternalError,
            InforequestError::Transport(_) => ErrorCode::InternalError,
            InforequestError::Domain(e) => e.code,
        }
    }

    /// Another writer committed first; the command may be retried.
    pub fn is_conflict(&self) -> bool {
        matches!(self, InforequestError::Domain(e) if e.is_conflict())
    }
}
