//! Closes inforequests whose every deadline is long gone.
//!
//! Each branch gets its EXPIRATION recorded where the obligee never answered,
//! then the inforequest is closed. Nobody is notified.

use crate::domain::foundation::DomainError;
use crate::domain::inforequest::Inforequest;
use crate::ports::OutboundEmail;

use super::job::{JobContext, JobServices, Recipient, ScheduledJob};

pub struct CloseInforequests {
    services: JobServices,
}

impl CloseInforequests {
    pub fn new(services: JobServices) -> Self {
        Self { services }
    }
}

impl ScheduledJob for CloseInforequests {
    fn name(&self) -> &'static str {
        "close_inforequests"
    }

    fn services(&self) -> &JobServices {
        &self.services
    }

    fn is_due(&self, inforequest: &Inforequest, ctx: &JobContext) -> bool {
        inforequest.is_closable_at(&self.services.jurisdiction, ctx.today)
    }

    fn notifies_applicant(&self) -> bool {
        false
    }

    fn apply(
        &self,
        inforequest: &mut Inforequest,
        ctx: &JobContext,
        _recipient: Option<&Recipient>,
    ) -> Result<Vec<OutboundEmail>, DomainError> {
        let expirations = inforequest.close_expired(&self.services.jurisdiction, ctx.today, ctx.now)?;
        tracing::info!(
            inforequest_id = %inforequest.id(),
            expirations = expirations.len(),
            "Inforequest closed"
        );
        Ok(Vec::new())
    }
}
