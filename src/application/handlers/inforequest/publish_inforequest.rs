//! PublishInforequestHandler - marks a closed inforequest as published.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::InforequestId;
use crate::ports::InforequestRepository;

use super::super::{load_inforequest, InforequestError};

#[derive(Debug, Clone)]
pub struct PublishInforequestCommand {
    pub inforequest_id: InforequestId,
    pub today: NaiveDate,
}

pub struct PublishInforequestHandler {
    repository: Arc<dyn InforequestRepository>,
}

impl PublishInforequestHandler {
    pub fn new(repository: Arc<dyn InforequestRepository>) -> Self {
        Self { repository }
    }

    /// Returns the publication date, which stays the first one on repeats.
    pub async fn handle(&self, cmd: PublishInforequestCommand) -> Result<NaiveDate, InforequestError> {
        let mut inforequest = load_inforequest(self.repository.as_ref(), cmd.inforequest_id).await?;
        if let Some(published_on) = inforequest.published_on() {
            return Ok(published_on);
        }
        let published_on = inforequest.publish(cmd.today)?;
        self.repository.update(&inforequest).await?;
        tracing::info!(inforequest_id = %cmd.inforequest_id, %published_on, "Inforequest published");
        Ok(published_on)
    }
}
