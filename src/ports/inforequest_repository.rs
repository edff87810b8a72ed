//! Inforequest repository port.
//!
//! Defines the contract for persisting and retrieving Inforequest aggregates.
//!
//! # Design
//!
//! - **Optimistic concurrency**: `update` succeeds only if the stored version
//!   still equals the aggregate's version, so a reload-decide-write unit never
//!   overwrites a concurrent writer.
//! - **Validated loads**: implementations run `Inforequest::validate` on every
//!   aggregate they return.

use crate::domain::foundation::{DomainError, InforequestId};
use crate::domain::inforequest::Inforequest;
use async_trait::async_trait;

/// Repository port for Inforequest aggregate persistence.
#[async_trait]
pub trait InforequestRepository: Send + Sync {
    /// Save a new inforequest.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the id or reply address is already taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, inforequest: &Inforequest) -> Result<(), DomainError>;

    /// Update an existing inforequest, returning the new version.
    ///
    /// # Errors
    ///
    /// - `InforequestNotFound` if it doesn't exist
    /// - `ConcurrentModification` if the stored version moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, inforequest: &Inforequest) -> Result<u64, DomainError>;

    /// Find an inforequest by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &InforequestId) -> Result<Option<Inforequest>, DomainError>;

    /// All inforequests that are not closed.
    async fn find_open(&self) -> Result<Vec<Inforequest>, DomainError>;

    /// Ids of the inforequests that are not closed, without decoding them.
    ///
    /// Batch jobs scan with this and load each candidate separately so one
    /// corrupted record cannot stop the whole run.
    async fn find_open_ids(&self) -> Result<Vec<InforequestId>, DomainError>;

    /// Find the inforequest owning a reply address (case-insensitive).
    async fn find_by_unique_email(&self, email: &str)
        -> Result<Option<Inforequest>, DomainError>;

    /// Delete an inforequest.
    ///
    /// # Errors
    ///
    /// - `InforequestNotFound` if it doesn't exist
    async fn delete(&self, id: &InforequestId) -> Result<(), DomainError>;
}
