//! Application handlers.
//!
//! Command handlers that orchestrate domain operations: load the aggregate,
//! apply the change, persist it with a version check, then hand off mail.

pub mod correspondence;
mod error;
pub mod inforequest;
mod outbound;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::InforequestError;

use crate::domain::foundation::InforequestId;
use crate::domain::inforequest::Inforequest;
use crate::ports::InforequestRepository;

/// Loads an inforequest or reports it missing.
pub(crate) async fn load_inforequest(
    repository: &dyn InforequestRepository,
    id: InforequestId,
) -> Result<Inforequest, InforequestError> {
    repository
        .find_by_id(&id)
        .await?
        .ok_or(InforequestError::NotFound(id))
}
