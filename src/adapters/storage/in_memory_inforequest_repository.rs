//! In-Memory Inforequest Repository
//!
//! Keeps every aggregate as a serialized JSON document, so each load goes
//! through the same decode-and-validate path a database adapter would.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, InforequestId};
use crate::domain::inforequest::Inforequest;
use crate::ports::InforequestRepository;

#[derive(Debug, Clone)]
struct StoredRecord {
    version: u64,
    closed: bool,
    unique_email: String,
    document: String,
}

/// In-memory storage for inforequests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInforequestRepository {
    records: Arc<RwLock<HashMap<InforequestId, StoredRecord>>>,
}

impl InMemoryInforequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored inforequests.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Replace the stored document verbatim (for corruption tests).
    pub async fn put_raw(&self, id: InforequestId, document: String) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            record.document = document;
        }
    }

    fn encode(inforequest: &Inforequest) -> Result<StoredRecord, DomainError> {
        let document = serde_json::to_string(inforequest).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Encoding failed: {}", e))
        })?;
        Ok(StoredRecord {
            version: inforequest.version(),
            closed: inforequest.is_closed(),
            unique_email: inforequest.unique_email().to_lowercase(),
            document,
        })
    }

    fn decode(record: &StoredRecord) -> Result<Inforequest, DomainError> {
        let inforequest: Inforequest = serde_json::from_str(&record.document).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Decoding failed: {}", e))
        })?;
        inforequest.validate()?;
        Ok(inforequest)
    }
}

#[async_trait]
impl InforequestRepository for InMemoryInforequestRepository {
    async fn save(&self, inforequest: &Inforequest) -> Result<(), DomainError> {
        let record = Self::encode(inforequest)?;
        let mut records = self.records.write().await;
        if records.contains_key(&inforequest.id()) {
            return Err(DomainError::validation("id", "Inforequest already exists")
                .with_detail("inforequest_id", inforequest.id().to_string()));
        }
        if records
            .values()
            .any(|r| r.unique_email == record.unique_email)
        {
            return Err(DomainError::validation(
                "unique_email",
                "Reply address is already taken",
            ));
        }
        records.insert(inforequest.id(), record);
        Ok(())
    }

    async fn update(&self, inforequest: &Inforequest) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let stored = records.get(&inforequest.id()).ok_or_else(|| {
            DomainError::new(ErrorCode::InforequestNotFound, "Inforequest not found")
                .with_detail("inforequest_id", inforequest.id().to_string())
        })?;
        if stored.version != inforequest.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                "Inforequest was modified concurrently",
            )
            .with_detail("inforequest_id", inforequest.id().to_string())
            .with_detail("expected_version", inforequest.version().to_string())
            .with_detail("stored_version", stored.version.to_string()));
        }

        let next_version = stored.version + 1;
        let mut next = inforequest.clone();
        next.set_version(next_version);
        let record = Self::encode(&next)?;
        records.insert(inforequest.id(), record);
        Ok(next_version)
    }

    async fn find_by_id(&self, id: &InforequestId) -> Result<Option<Inforequest>, DomainError> {
        let records = self.records.read().await;
        records.get(id).map(Self::decode).transpose()
    }

    async fn find_open(&self) -> Result<Vec<Inforequest>, DomainError> {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| !r.closed)
            .map(Self::decode)
            .collect()
    }

    async fn find_open_ids(&self) -> Result<Vec<InforequestId>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|(_, r)| !r.closed)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn find_by_unique_email(
        &self,
        email: &str,
    ) -> Result<Option<Inforequest>, DomainError> {
        let needle = email.to_lowercase();
        let records = self.records.read().await;
        records
            .values()
            .find(|r| r.unique_email == needle)
            .map(Self::decode)
            .transpose()
    }

    async fn delete(&self, id: &InforequestId) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.remove(id).map(|_| ()).ok_or_else(|| {
            DomainError::new(ErrorCode::InforequestNotFound, "Inforequest not found")
                .with_detail("inforequest_id", id.to_string())
        })
    }
}
