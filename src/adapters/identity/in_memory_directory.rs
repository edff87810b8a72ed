//! In-memory applicant and obligee directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ApplicantId, DomainError, ErrorCode, ObligeeId};
use crate::domain::inforequest::{Applicant, Obligee};
use crate::ports::IdentityProvider;

/// On-disk shape of a directory seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryFile {
    #[serde(default)]
    pub applicants: Vec<Applicant>,
    #[serde(default)]
    pub obligees: Vec<Obligee>,
}

/// Contact directory backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    applicants: Arc<RwLock<HashMap<ApplicantId, Applicant>>>,
    obligees: Arc<RwLock<HashMap<ObligeeId, Obligee>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a directory from a YAML seed file.
    pub async fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Reading {} failed: {}", path.display(), e),
            )
        })?;
        let file: DirectoryFile = serde_yaml::from_str(&yaml).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Decoding {} failed: {}", path.display(), e),
            )
        })?;

        let directory = Self::new();
        for applicant in file.applicants {
            directory.insert_applicant(applicant).await;
        }
        for obligee in file.obligees {
            directory.insert_obligee(obligee).await;
        }
        Ok(directory)
    }

    pub async fn insert_applicant(&self, applicant: Applicant) {
        self.applicants.write().await.insert(applicant.id, applicant);
    }

    pub async fn insert_obligee(&self, obligee: Obligee) {
        self.obligees.write().await.insert(obligee.id, obligee);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryDirectory {
    async fn applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, DomainError> {
        Ok(self.applicants.read().await.get(id).cloned())
    }

    async fn obligee(&self, id: &ObligeeId) -> Result<Option<Obligee>, DomainError> {
        Ok(self.obligees.read().await.get(id).cloned())
    }
}
