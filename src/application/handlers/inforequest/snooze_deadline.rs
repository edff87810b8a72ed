//! SnoozeDeadlineHandler - postpones the deadline of a branch's last action.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{ActionId, InforequestId};
use crate::domain::inforequest::Jurisdiction;
use crate::ports::InforequestRepository;

use super::super::{load_inforequest, InforequestError};

#[derive(Debug, Clone)]
pub struct SnoozeDeadlineCommand {
    pub inforequest_id: InforequestId,
    pub action_id: ActionId,
    /// New snooze date; `None` clears a previous snooze.
    pub snooze: Option<NaiveDate>,
}

pub struct SnoozeDeadlineHandler {
    repository: Arc<dyn InforequestRepository>,
    jurisdiction: Arc<Jurisdiction>,
}

impl SnoozeDeadlineHandler {
    pub fn new(repository: Arc<dyn InforequestRepository>, jurisdiction: Arc<Jurisdiction>) -> Self {
        Self {
            repository,
            jurisdiction,
        }
    }

    /// Returns the new version.
    pub async fn handle(&self, cmd: SnoozeDeadlineCommand) -> Result<u64, InforequestError> {
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        inforequest.snooze(&self.jurisdiction, cmd.action_id, cmd.snooze)?;
        let version = self.repository.update(&inforequest).await?;
        tracing::info!(
            inforequest_id = %cmd.inforequest_id,
            action_id = %cmd.action_id,
            snooze = ?cmd.snooze,
            "Deadline snoozed"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::{date, Fixture};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn snooze_moves_the_deadline_and_only_forward() {
        let f = Fixture::new().await;
        let ir = f.submitted(date(2010, 10, 5)).await;
        let request_id = ir.main_branch().last_action().unwrap().id();
        let handler = SnoozeDeadlineHandler::new(f.repo.clone(), f.jurisdiction.clone());

        handler
            .handle(SnoozeDeadlineCommand {
                inforequest_id: ir.id(),
                action_id: request_id,
                snooze: Some(date(2010, 10, 20)),
            })
            .await
            .unwrap();
        let stored = f.load(ir.id()).await;
        let deadline = stored.main_branch().last_deadline(&f.jurisdiction).unwrap();
        assert_eq!(deadline.snooze_date(), date(2010, 10, 20));

        let err = handler
            .handle(SnoozeDeadlineCommand {
                inforequest_id: ir.id(),
                action_id: request_id,
                snooze: Some(date(2010, 10, 18)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSnooze);
    }
}
