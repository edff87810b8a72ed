//! Applicants, obligees and the frozen copies kept on inforequests.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ApplicantId, ObligeeId};

/// Applicant contact data as held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub email: String,
}

/// Public authority contact data as held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligee {
    pub id: ObligeeId,
    pub name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub emails: Vec<String>,
}

/// Applicant address as it was on the day of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
}

impl From<&Applicant> for ApplicantSnapshot {
    fn from(applicant: &Applicant) -> Self {
        Self {
            name: applicant.name.clone(),
            street: applicant.street.clone(),
            city: applicant.city.clone(),
            zip: applicant.zip.clone(),
        }
    }
}

/// Obligee contacts as they were when the branch was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligeeSnapshot {
    pub obligee_id: ObligeeId,
    pub name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub emails: Vec<String>,
}

impl From<&Obligee> for ObligeeSnapshot {
    fn from(obligee: &Obligee) -> Self {
        Self {
            obligee_id: obligee.id,
            name: obligee.name.clone(),
            street: obligee.street.clone(),
            city: obligee.city.clone(),
            zip: obligee.zip.clone(),
            emails: obligee.emails.clone(),
        }
    }
}
