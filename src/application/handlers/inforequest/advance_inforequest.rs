//! AdvanceInforequestHandler - records an advancement to other obligees.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, BranchId, InforequestId, ObligeeId, Timestamp};
use crate::domain::inforequest::{ActionDraft, Obligee};
use crate::ports::{IdentityProvider, InforequestRepository};

use super::super::{load_inforequest, InforequestError};

/// Command to record that the obligee forwarded the request.
#[derive(Debug, Clone)]
pub struct AdvanceInforequestCommand {
    pub inforequest_id: InforequestId,
    pub branch_id: BranchId,
    pub draft: ActionDraft,
    pub target_obligee_ids: Vec<ObligeeId>,
}

#[derive(Debug, Clone)]
pub struct AdvanceInforequestResult {
    pub advancement_id: ActionId,
    pub new_branch_ids: Vec<BranchId>,
    pub version: u64,
}

pub struct AdvanceInforequestHandler {
    repository: Arc<dyn InforequestRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl AdvanceInforequestHandler {
    pub fn new(
        repository: Arc<dyn InforequestRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            repository,
            identity,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdvanceInforequestCommand,
    ) -> Result<AdvanceInforequestResult, InforequestError> {
        let targets = resolve_obligees(self.identity.as_ref(), &cmd.target_obligee_ids).await?;
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;

        let (advancement_id, new_branch_ids) =
            inforequest.add_advancement(cmd.branch_id, cmd.draft, &targets, Timestamp::now())?;
        let version = self.repository.update(&inforequest).await?;

        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            branch_id = %cmd.branch_id,
            action_id = %advancement_id,
            targets = new_branch_ids.len(),
            "Inforequest advanced"
        );
        Ok(AdvanceInforequestResult {
            advancement_id,
            new_branch_ids,
            version,
        })
    }
}

/// Looks up every target obligee, failing on the first unknown id.
pub(crate) async fn resolve_obligees(
    identity: &dyn IdentityProvider,
    ids: &[ObligeeId],
) -> Result<Vec<Obligee>, InforequestError> {
    let mut obligees = Vec::with_capacity(ids.len());
    for id in ids {
        let obligee = identity
            .obligee(id)
            .await?
            .ok_or(InforequestError::ObligeeNotFound(*id))?;
        obligees.push(obligee);
    }
    Ok(obligees)
}
