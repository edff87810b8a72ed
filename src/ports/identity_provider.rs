//! Identity provider port - read-only contact data for both parties.

use async_trait::async_trait;

use crate::domain::foundation::{ApplicantId, DomainError, ObligeeId};
use crate::domain::inforequest::{Applicant, Obligee};

/// Port for looking up applicants and obligees.
///
/// Inforequests keep frozen snapshots; lookups are only needed when a
/// snapshot is taken or the applicant's current email is required.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, DomainError>;

    async fn obligee(&self, id: &ObligeeId) -> Result<Option<Obligee>, DomainError>;
}
