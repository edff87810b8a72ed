//! DeleteActionHandler - administrative removal of a branch's last action.

use std::sync::Arc;

use crate::domain::foundation::{ActionId, BranchId, InforequestId};
use crate::ports::InforequestRepository;

use super::super::{load_inforequest, InforequestError};

#[derive(Debug, Clone)]
pub struct DeleteActionCommand {
    pub inforequest_id: InforequestId,
    pub action_id: ActionId,
}

#[derive(Debug, Clone)]
pub struct DeleteActionResult {
    /// Branches spawned by a deleted advancement, removed with it.
    pub removed_branch_ids: Vec<BranchId>,
    pub version: u64,
}

pub struct DeleteActionHandler {
    repository: Arc<dyn InforequestRepository>,
}

impl DeleteActionHandler {
    pub fn new(repository: Arc<dyn InforequestRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteActionCommand,
    ) -> Result<DeleteActionResult, InforequestError> {
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        let removed_branch_ids = inforequest.delete_action(cmd.action_id)?;
        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            action_id = %cmd.action_id,
            removed_branches = removed_branch_ids.len(),
            "Action deleted"
        );
        Ok(DeleteActionResult {
            removed_branch_ids,
            version,
        })
    }
}
